//! Bicycle records

use serde::{Deserialize, Serialize};

/// A bicycle registered to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bicycle {
    /// Serial number, unique across all bicycles
    pub serial: String,

    /// Identity number of the owning user
    ///
    /// Always references an existing user at registration time.
    pub owner_identity: String,

    pub brand: String,
    pub model: String,
}

impl Bicycle {
    pub fn new(serial: &str, owner_identity: &str, brand: &str, model: &str) -> Self {
        Bicycle {
            serial: serial.to_string(),
            owner_identity: owner_identity.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
        }
    }
}
