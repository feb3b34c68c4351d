//! Input and consistency validators
//!
//! Format checks are pure functions over strings. Uniqueness and movement
//! checks read the record store but never modify it.
//!
//! Callers trim input before validating; nothing here trims.

use crate::store::RecordStore;
use crate::types::{Bicycle, BicycleState, MovementEvent, ParkingError, User};
use once_cell::sync::Lazy;
use regex::Regex;

/// 8 ASCII digits followed by one letter of either case
pub fn is_valid_identity(identity: &str) -> bool {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[0-9]{8}[A-Za-z]$").expect("valid regex"));
    RE.is_match(identity)
}

/// Text, `@`, then a domain containing a dot, with no whitespace anywhere
pub fn is_valid_email(email: &str) -> bool {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
    RE.is_match(email)
}

/// Exact emptiness, no trimming
pub fn is_empty(text: &str) -> bool {
    text.is_empty()
}

/// Lowercase `text` and drop all whitespace
///
/// ```
/// use bike_parking::core::validators::normalize_text;
///
/// assert_eq!(normalize_text("A B c D"), "abcd");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True if no registered user has this identity number
pub fn is_unique_identity<S: RecordStore>(store: &S, identity: &str) -> Result<bool, ParkingError> {
    let users: Vec<User> = store.scan()?;
    Ok(!users.iter().any(|user| user.identity == identity))
}

/// True if no registered user has an equivalent email
///
/// Emails are compared after [`normalize_text`].
pub fn is_unique_email<S: RecordStore>(store: &S, email: &str) -> Result<bool, ParkingError> {
    let wanted = normalize_text(email);
    let users: Vec<User> = store.scan()?;
    Ok(!users.iter().any(|user| normalize_text(&user.email) == wanted))
}

/// True if no registered bicycle has this serial
pub fn is_unique_serial<S: RecordStore>(store: &S, serial: &str) -> Result<bool, ParkingError> {
    let bicycles: Vec<Bicycle> = store.scan()?;
    Ok(!bicycles.iter().any(|bicycle| bicycle.serial == serial))
}

/// Most recent movement of `serial`
///
/// The latest timestamp wins; among equal timestamps, the event that comes
/// later in `events` wins.
pub fn latest_event<'a>(events: &'a [MovementEvent], serial: &str) -> Option<&'a MovementEvent> {
    events
        .iter()
        .filter(|event| event.serial == serial)
        .fold(None, |latest, event| match latest {
            Some(current) if current.timestamp > event.timestamp => Some(current),
            _ => Some(event),
        })
}

/// State of `serial` according to `events`
pub fn bicycle_state(events: &[MovementEvent], serial: &str) -> BicycleState {
    BicycleState::from_latest(latest_event(events, serial).map(|event| event.action))
}

/// True if the bicycle has never moved or last moved `OUT`
pub fn can_enter<S: RecordStore>(store: &S, serial: &str) -> Result<bool, ParkingError> {
    let events: Vec<MovementEvent> = store.scan()?;
    Ok(bicycle_state(&events, serial).can_enter())
}

/// True if the bicycle last moved `IN`
pub fn can_exit<S: RecordStore>(store: &S, serial: &str) -> Result<bool, ParkingError> {
    let events: Vec<MovementEvent> = store.scan()?;
    Ok(bicycle_state(&events, serial).can_exit())
}
