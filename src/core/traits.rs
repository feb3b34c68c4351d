//! Core traits
//!
//! Abstractions injected into the domain rules so alternative implementations
//! (for example a fixed clock in tests) can be substituted.

use chrono::{Local, NaiveDateTime, Timelike};

/// Source of timestamps for movement events
pub trait Clock {
    /// Current time at second precision
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, truncated to whole seconds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Clock that always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
