//! Types module
//!
//! Contains the core data structures used throughout the application:
//! - `user`: registered users
//! - `bicycle`: registered bicycles
//! - `movement`: entry/exit events, actions and derived bicycle states
//! - `error`: error types for the parking system

pub mod bicycle;
pub mod error;
pub mod movement;
pub mod user;

pub use bicycle::Bicycle;
pub use error::{ErrorKind, ParkingError};
pub use movement::{Action, BicycleState, MovementEvent, TIMESTAMP_FORMAT};
pub use user::User;
