//! Error types for the bike parking system
//!
//! This module defines every error the validators, domain rules and record
//! stores can report. Errors are descriptive so the console front end can show
//! them to the operator as-is.
//!
//! # Error Categories
//!
//! Each variant belongs to one [`ErrorKind`]:
//!
//! - **Validation**: empty or malformed input
//! - **Uniqueness**: duplicate identity, email or serial
//! - **NotFound**: a referenced user or bicycle does not exist
//! - **Conflict**: the operation is blocked by related records
//! - **State**: the movement is not permitted by the bicycle's current state
//! - **UnsupportedAction**: an action outside `IN`/`OUT` (contract violation)
//! - **Storage**: the record store failed

use std::fmt;
use thiserror::Error;

/// Broad classification of a [`ParkingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Uniqueness,
    NotFound,
    Conflict,
    State,
    UnsupportedAction,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Uniqueness => "uniqueness",
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::State => "state",
            ErrorKind::UnsupportedAction => "unsupported action",
            ErrorKind::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// Main error type for the bike parking system
///
/// Every fallible operation in the crate returns this type. Variants carry the
/// offending values so messages identify exactly which input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParkingError {
    /// A required field was empty
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// Name of the empty field
        field: &'static str,
    },

    /// Identity number does not match 8 digits followed by a letter
    #[error("Identity number '{identity}' is not valid (expected 8 digits and a letter)")]
    InvalidIdentity { identity: String },

    /// Email does not look like text@domain.tld
    #[error("Email '{email}' is not valid")]
    InvalidEmail { email: String },

    /// A user with this identity number is already registered
    #[error("Identity number {identity} is already registered")]
    DuplicateIdentity { identity: String },

    /// A user with an equivalent email is already registered
    ///
    /// Emails are compared ignoring case and whitespace.
    #[error("Email {email} is already registered")]
    DuplicateEmail { email: String },

    /// A bicycle with this serial is already registered
    #[error("Bicycle with serial {serial} is already registered")]
    DuplicateSerial { serial: String },

    /// No user has this identity number
    #[error("User {identity} not found")]
    UserNotFound { identity: String },

    /// No bicycle has this serial
    #[error("Bicycle {serial} not found")]
    BicycleNotFound { serial: String },

    /// The user still owns bicycles and cannot be deleted
    #[error("User {identity} still owns {count} bicycle(s)")]
    UserHasBicycles { identity: String, count: usize },

    /// The identity in a movement request is not the bicycle's owner
    #[error("Bicycle {serial} belongs to {owner}, not {identity}")]
    OwnerMismatch {
        serial: String,
        /// Owner of record
        owner: String,
        /// Identity supplied with the request
        identity: String,
    },

    /// The bicycle's current state does not allow the requested action
    #[error("Bicycle {serial} cannot {action}: it is {state}")]
    InvalidTransition {
        serial: String,
        action: String,
        state: String,
    },

    /// Action was neither IN nor OUT
    ///
    /// This signals a caller defect rather than bad operator input.
    #[error("Unsupported action '{action}': must be IN or OUT")]
    UnsupportedAction { action: String },

    /// I/O failure in the record store
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A persisted row could not be decoded
    #[error("Malformed {kind} record{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedRecord {
        kind: &'static str,
        line: Option<u64>,
        message: String,
    },

    /// A field name that the record kind does not have
    #[error("Unknown field '{field}' for {kind} records")]
    UnknownField { kind: &'static str, field: String },
}

impl ParkingError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkingError::EmptyField { .. }
            | ParkingError::InvalidIdentity { .. }
            | ParkingError::InvalidEmail { .. } => ErrorKind::Validation,
            ParkingError::DuplicateIdentity { .. }
            | ParkingError::DuplicateEmail { .. }
            | ParkingError::DuplicateSerial { .. } => ErrorKind::Uniqueness,
            ParkingError::UserNotFound { .. } | ParkingError::BicycleNotFound { .. } => {
                ErrorKind::NotFound
            }
            ParkingError::UserHasBicycles { .. } | ParkingError::OwnerMismatch { .. } => {
                ErrorKind::Conflict
            }
            ParkingError::InvalidTransition { .. } => ErrorKind::State,
            ParkingError::UnsupportedAction { .. } => ErrorKind::UnsupportedAction,
            ParkingError::Storage { .. }
            | ParkingError::MalformedRecord { .. }
            | ParkingError::UnknownField { .. } => ErrorKind::Storage,
        }
    }

    /// Whether the error indicates a defect the operator cannot fix by retrying
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::UnsupportedAction
    }
}

impl From<std::io::Error> for ParkingError {
    fn from(error: std::io::Error) -> Self {
        ParkingError::Storage {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ParkingError {
    fn from(error: csv::Error) -> Self {
        ParkingError::Storage {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ParkingError {
    pub fn empty_field(field: &'static str) -> Self {
        ParkingError::EmptyField { field }
    }

    pub fn invalid_identity(identity: &str) -> Self {
        ParkingError::InvalidIdentity {
            identity: identity.to_string(),
        }
    }

    pub fn invalid_email(email: &str) -> Self {
        ParkingError::InvalidEmail {
            email: email.to_string(),
        }
    }

    pub fn duplicate_identity(identity: &str) -> Self {
        ParkingError::DuplicateIdentity {
            identity: identity.to_string(),
        }
    }

    pub fn duplicate_email(email: &str) -> Self {
        ParkingError::DuplicateEmail {
            email: email.to_string(),
        }
    }

    pub fn duplicate_serial(serial: &str) -> Self {
        ParkingError::DuplicateSerial {
            serial: serial.to_string(),
        }
    }

    pub fn user_not_found(identity: &str) -> Self {
        ParkingError::UserNotFound {
            identity: identity.to_string(),
        }
    }

    pub fn bicycle_not_found(serial: &str) -> Self {
        ParkingError::BicycleNotFound {
            serial: serial.to_string(),
        }
    }

    pub fn user_has_bicycles(identity: &str, count: usize) -> Self {
        ParkingError::UserHasBicycles {
            identity: identity.to_string(),
            count,
        }
    }

    pub fn owner_mismatch(serial: &str, owner: &str, identity: &str) -> Self {
        ParkingError::OwnerMismatch {
            serial: serial.to_string(),
            owner: owner.to_string(),
            identity: identity.to_string(),
        }
    }

    pub fn invalid_transition(serial: &str, action: &str, state: &str) -> Self {
        ParkingError::InvalidTransition {
            serial: serial.to_string(),
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    pub fn unsupported_action(action: &str) -> Self {
        ParkingError::UnsupportedAction {
            action: action.to_string(),
        }
    }

    pub fn malformed_record(kind: &'static str, line: Option<u64>, message: &str) -> Self {
        ParkingError::MalformedRecord {
            kind,
            line,
            message: message.to_string(),
        }
    }
}
