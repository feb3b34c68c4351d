//! User records

use serde::{Deserialize, Serialize};

/// A registered user of the parking facility
///
/// Users are immutable once created. The identity number and the email are
/// each unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity number: 8 digits followed by a letter
    pub identity: String,

    pub name: String,

    /// Contact email, unique ignoring case and whitespace
    pub email: String,
}

impl User {
    pub fn new(identity: &str, name: &str, email: &str) -> Self {
        User {
            identity: identity.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}
