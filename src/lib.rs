//! Bicycle Parking Library
//! # Overview
//!
//! This library tracks the bicycles of registered users entering and leaving a
//! parking lot, keeping users, bicycles and an append-only movement log in a
//! record store.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (User, Bicycle, MovementEvent, errors)
//! - [`cli`] - CLI arguments parsing and the interactive menu
//! - [`config`] - Storage locations loaded from TOML
//! - [`core`] - Business logic components:
//!   - [`core::validators`] - Format, uniqueness and movement checks
//!   - [`core::engine`] - Domain rules orchestration
//!   - [`core::state_index`] - Latest movement per bicycle
//! - [`store`] - Record persistence (CSV files or memory)
//!
//! # Movement Rules
//!
//! Each bicycle moves through three states:
//!
//! - **Never entered**: no movement recorded; only IN is allowed
//! - **Parked in**: the latest movement is IN; only OUT is allowed
//! - **Parked out**: the latest movement is OUT; only IN is allowed
//!
//! The latest movement is the one with the greatest timestamp; among equal
//! timestamps the one recorded last wins.
//!
//! ```
//! use bike_parking::{BicycleState, MemoryStore, ParkingEngine};
//!
//! let mut engine = ParkingEngine::new(MemoryStore::new());
//! engine.register_user("12345678A", "Ana", "ana@mail.com").unwrap();
//! engine.register_bicycle("B1", "12345678A", "Orbea", "MX20").unwrap();
//! engine.record_movement("IN", "12345678A", "B1").unwrap();
//!
//! assert_eq!(engine.bicycle_state("B1").unwrap(), BicycleState::ParkedIn);
//! assert!(engine.record_movement("IN", "12345678A", "B1").is_err());
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod store;
pub mod types;

pub use config::Config;
pub use crate::core::{Clock, ParkingEngine, StateIndex, SystemClock};
pub use store::{CsvStore, MemoryStore, RecordStore};
pub use types::{
    Action, Bicycle, BicycleState, ErrorKind, MovementEvent, ParkingError, User,
};
