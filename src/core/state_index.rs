//! Per-bicycle state index
//!
//! Deriving a bicycle's state from the movement log means scanning every
//! event. The index keeps the latest action per serial so the domain rules
//! can answer state questions in constant time. The movement log stays the
//! source of truth: the index is built from a full scan and then fed every
//! event the domain rules append.

use crate::types::{Action, BicycleState, MovementEvent};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Latest movement per bicycle serial
#[derive(Debug, Default, Clone)]
pub struct StateIndex {
    latest: HashMap<String, (NaiveDateTime, Action)>,

    /// Greatest timestamp seen across all bicycles
    newest: Option<NaiveDateTime>,
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a movement log in insertion order
    pub fn from_events(events: &[MovementEvent]) -> Self {
        let mut index = Self::new();
        for event in events {
            index.record(event);
        }
        index
    }

    /// Account for an event appended after everything already recorded
    ///
    /// Same selection rule as [`crate::core::validators::latest_event`]: a
    /// later-recorded event with an equal timestamp replaces the current one.
    pub fn record(&mut self, event: &MovementEvent) {
        let replace = match self.latest.get(&event.serial) {
            Some((timestamp, _)) => event.timestamp >= *timestamp,
            None => true,
        };
        if replace {
            self.latest
                .insert(event.serial.clone(), (event.timestamp, event.action));
        }

        self.newest = Some(match self.newest {
            Some(newest) => newest.max(event.timestamp),
            None => event.timestamp,
        });
    }

    pub fn state(&self, serial: &str) -> BicycleState {
        BicycleState::from_latest(self.latest.get(serial).map(|(_, action)| *action))
    }

    /// Greatest timestamp recorded so far
    pub fn newest_timestamp(&self) -> Option<NaiveDateTime> {
        self.newest
    }

    /// Number of bicycles with at least one movement
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}
