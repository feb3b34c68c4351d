//! Operation dispatch
//!
//! Runs one [`Operation`] against the domain rules and turns the result into
//! the line shown to the operator after `OK:`.

use super::args::Operation;
use crate::core::{Clock, ParkingEngine};
use crate::store::RecordStore;
use crate::types::{MovementEvent, ParkingError};

impl Operation {
    /// Run this operation and describe its outcome
    pub fn execute<S: RecordStore, C: Clock>(
        &self,
        engine: &mut ParkingEngine<S, C>,
    ) -> Result<String, ParkingError> {
        match self {
            Operation::RegisterUser {
                identity,
                name,
                email,
            } => {
                let user = engine.register_user(identity, name, email)?;
                Ok(format!("User {} ({}) registered", user.identity, user.name))
            }
            Operation::DeleteUser { identity } => {
                engine.delete_user(identity)?;
                Ok(format!("User {} deleted", identity))
            }
            Operation::RegisterBike {
                serial,
                owner,
                brand,
                model,
            } => {
                let bicycle = engine.register_bicycle(serial, owner, brand, model)?;
                Ok(format!(
                    "Bicycle {} ({} {}) registered for {}",
                    bicycle.serial, bicycle.brand, bicycle.model, bicycle.owner_identity
                ))
            }
            Operation::DeleteBike { serial } => {
                engine.delete_bicycle(serial)?;
                Ok(format!("Bicycle {} deleted", serial))
            }
            Operation::CheckIn { identity, serial } => {
                let event = engine.check_in(identity, serial)?;
                Ok(describe_movement(&event))
            }
            Operation::CheckOut { identity, serial } => {
                let event = engine.check_out(identity, serial)?;
                Ok(describe_movement(&event))
            }
            Operation::Record {
                action,
                identity,
                serial,
            } => {
                let event = engine.record_movement(action, identity, serial)?;
                Ok(describe_movement(&event))
            }
            Operation::ListBikes { identity } => {
                let serials = engine.list_bicycles_for_user(identity)?;
                if serials.is_empty() {
                    Ok(format!("User {} owns no bicycles", identity))
                } else {
                    Ok(format!("User {} owns: {}", identity, serials.join(", ")))
                }
            }
            Operation::Status { serial } => {
                let state = engine.bicycle_state(serial)?;
                Ok(format!("Bicycle {} is {}", serial, state))
            }
        }
    }
}

fn describe_movement(event: &MovementEvent) -> String {
    format!(
        "{} {} for bicycle {} at {}",
        event.action,
        event.owner_identity,
        event.serial,
        event.formatted_timestamp()
    )
}
