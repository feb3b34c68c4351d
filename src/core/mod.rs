//! Core business logic module
//!
//! This module contains the parking lot rules:
//! - `traits` - Trait abstractions for interchangeable implementations
//! - `validators` - Format, uniqueness and movement checks
//! - `state_index` - Latest movement per bicycle
//! - `engine` - Domain rules orchestration

pub mod engine;
pub mod state_index;
pub mod traits;
pub mod validators;

pub use engine::ParkingEngine;
pub use state_index::StateIndex;
pub use traits::{Clock, FixedClock, SystemClock};
