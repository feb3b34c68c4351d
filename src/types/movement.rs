//! Movement-related types
//!
//! A movement event records a bicycle entering (`IN`) or leaving (`OUT`) the
//! facility. Events are append-only; the latest event of a bicycle determines
//! its [`BicycleState`].

use super::error::ParkingError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persisted timestamp format for movement events (second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Direction of a movement
///
/// Persisted as `IN` or `OUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// The bicycle is checked into the facility
    In,
    /// The bicycle is checked out of the facility
    Out,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::In => "IN",
            Action::Out => "OUT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParkingError;

    /// Parse an action, ignoring case
    ///
    /// Anything other than `IN` or `OUT` is an
    /// [`ParkingError::UnsupportedAction`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IN" => Ok(Action::In),
            "OUT" => Ok(Action::Out),
            _ => Err(ParkingError::unsupported_action(s)),
        }
    }
}

/// A single entry or exit of a bicycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// When the movement was recorded, at second precision
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub action: Action,
    /// Serial of the bicycle that moved
    pub serial: String,
    /// Identity number of the bicycle's owner
    pub owner_identity: String,
}

impl MovementEvent {
    pub fn new(timestamp: NaiveDateTime, action: Action, serial: &str, owner_identity: &str) -> Self {
        MovementEvent {
            timestamp,
            action,
            serial: serial.to_string(),
            owner_identity: owner_identity.to_string(),
        }
    }

    /// Timestamp rendered in [`TIMESTAMP_FORMAT`]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Serde adapter persisting timestamps in [`TIMESTAMP_FORMAT`]
mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        timestamp: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", text, e)))
    }
}

/// Parking state of a bicycle, derived from its latest movement
///
/// ```text
/// NeverEntered --IN--> ParkedIn
/// ParkedOut    --IN--> ParkedIn
/// ParkedIn     --OUT-> ParkedOut
/// ```
///
/// Every other transition is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BicycleState {
    /// No movement has ever been recorded
    NeverEntered,
    /// Latest movement is `IN`
    ParkedIn,
    /// Latest movement is `OUT`
    ParkedOut,
}

impl BicycleState {
    /// State after the given latest action (or none)
    pub fn from_latest(action: Option<Action>) -> Self {
        match action {
            None => BicycleState::NeverEntered,
            Some(Action::In) => BicycleState::ParkedIn,
            Some(Action::Out) => BicycleState::ParkedOut,
        }
    }

    pub fn can_enter(&self) -> bool {
        matches!(self, BicycleState::NeverEntered | BicycleState::ParkedOut)
    }

    pub fn can_exit(&self) -> bool {
        matches!(self, BicycleState::ParkedIn)
    }

    /// Whether `action` is a permitted transition from this state
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::In => self.can_enter(),
            Action::Out => self.can_exit(),
        }
    }
}

impl fmt::Display for BicycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BicycleState::NeverEntered => "never entered",
            BicycleState::ParkedIn => "parked in",
            BicycleState::ParkedOut => "parked out",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("IN", Action::In)]
    #[case("in", Action::In)]
    #[case("Out", Action::Out)]
    #[case("OUT", Action::Out)]
    fn test_action_parsing_ignores_case(#[case] input: &str, #[case] expected: Action) {
        assert_eq!(input.parse::<Action>().unwrap(), expected);
    }

    #[rstest]
    #[case("ALGO")]
    #[case("")]
    #[case("INOUT")]
    fn test_action_parsing_rejects_unknown(#[case] input: &str) {
        let err = input.parse::<Action>().unwrap_err();
        assert!(matches!(err, ParkingError::UnsupportedAction { .. }));
    }

    #[rstest]
    #[case::never_in(BicycleState::NeverEntered, Action::In, true)]
    #[case::never_out(BicycleState::NeverEntered, Action::Out, false)]
    #[case::in_in(BicycleState::ParkedIn, Action::In, false)]
    #[case::in_out(BicycleState::ParkedIn, Action::Out, true)]
    #[case::out_in(BicycleState::ParkedOut, Action::In, true)]
    #[case::out_out(BicycleState::ParkedOut, Action::Out, false)]
    fn test_state_transitions(
        #[case] state: BicycleState,
        #[case] action: Action,
        #[case] allowed: bool,
    ) {
        assert_eq!(state.allows(action), allowed);
    }

    #[test]
    fn test_formatted_timestamp() {
        let ts = NaiveDateTime::parse_from_str("2025-03-01 08:15:22", TIMESTAMP_FORMAT).unwrap();
        let event = MovementEvent::new(ts, Action::In, "BK001", "12345678A");
        assert_eq!(event.formatted_timestamp(), "2025-03-01 08:15:22");
    }
}
