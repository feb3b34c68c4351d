//! Parking domain rules
//!
//! This module provides the ParkingEngine that applies the business rules of
//! the parking lot on top of a record store.
//!
//! The engine enforces rules such as:
//! - Required fields, identity and email formats
//! - Uniqueness of identity numbers, emails and serials
//! - Bicycles belong to a registered owner, who is the only one moving them
//! - A bicycle alternates IN and OUT movements, starting with IN
//! - Users owning bicycles cannot be deleted
//!
//! Every check of an operation runs in a fixed order and the first failure
//! is returned. Nothing is written unless all checks pass.

use crate::core::state_index::StateIndex;
use crate::core::traits::{Clock, SystemClock};
use crate::core::validators::{
    is_empty, is_unique_email, is_unique_identity, is_unique_serial, is_valid_email,
    is_valid_identity,
};
use crate::store::RecordStore;
use crate::types::{Action, Bicycle, BicycleState, MovementEvent, ParkingError, User};
use tracing::instrument;

/// Parking domain rules engine
///
/// Owns the record store for the session. Movement state is answered from a
/// [`StateIndex`] built from the movement log on first use.
pub struct ParkingEngine<S, C = SystemClock> {
    store: S,
    clock: C,
    index: Option<StateIndex>,
}

impl<S: RecordStore> ParkingEngine<S> {
    /// Create an engine stamping movements with the local wall clock
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> ParkingEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        ParkingEngine {
            store,
            clock,
            index: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - identity, name or email is empty
    /// - identity or email is malformed
    /// - identity or email is already registered
    /// - the store fails
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn register_user(
        &mut self,
        identity: &str,
        name: &str,
        email: &str,
    ) -> Result<User, ParkingError> {
        require("identity", identity)?;
        require("name", name)?;
        require("email", email)?;

        if !is_valid_identity(identity) {
            return Err(ParkingError::invalid_identity(identity));
        }
        if !is_valid_email(email) {
            return Err(ParkingError::invalid_email(email));
        }
        if !is_unique_identity(&self.store, identity)? {
            return Err(ParkingError::duplicate_identity(identity));
        }
        if !is_unique_email(&self.store, email)? {
            return Err(ParkingError::duplicate_email(email));
        }

        let user = User::new(identity, name, email);
        self.store.append(&user)?;

        tracing::info!(identity, "registered user");
        Ok(user)
    }

    /// Register a bicycle for an existing user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - any field is empty
    /// - no user has identity `owner_identity`
    /// - the serial is already registered
    /// - the store fails
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn register_bicycle(
        &mut self,
        serial: &str,
        owner_identity: &str,
        brand: &str,
        model: &str,
    ) -> Result<Bicycle, ParkingError> {
        require("serial", serial)?;
        require("owner_identity", owner_identity)?;
        require("brand", brand)?;
        require("model", model)?;

        if is_unique_identity(&self.store, owner_identity)? {
            return Err(ParkingError::user_not_found(owner_identity));
        }
        if !is_unique_serial(&self.store, serial)? {
            return Err(ParkingError::duplicate_serial(serial));
        }

        let bicycle = Bicycle::new(serial, owner_identity, brand, model);
        self.store.append(&bicycle)?;

        tracing::info!(serial, owner = owner_identity, "registered bicycle");
        Ok(bicycle)
    }

    /// Record a movement given its action as text
    ///
    /// `action` is case-insensitive. Anything other than `IN` or `OUT` is a
    /// contract violation reported as [`ParkingError::UnsupportedAction`]
    /// before any other check runs.
    pub fn record_movement(
        &mut self,
        action: &str,
        identity: &str,
        serial: &str,
    ) -> Result<MovementEvent, ParkingError> {
        let action: Action = action.parse()?;
        self.move_bicycle(action, identity, serial)
    }

    /// Park a bicycle
    pub fn check_in(&mut self, identity: &str, serial: &str) -> Result<MovementEvent, ParkingError> {
        self.move_bicycle(Action::In, identity, serial)
    }

    /// Take a parked bicycle out
    pub fn check_out(&mut self, identity: &str, serial: &str) -> Result<MovementEvent, ParkingError> {
        self.move_bicycle(Action::Out, identity, serial)
    }

    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    fn move_bicycle(
        &mut self,
        action: Action,
        identity: &str,
        serial: &str,
    ) -> Result<MovementEvent, ParkingError> {
        require("identity", identity)?;
        require("serial", serial)?;

        if is_unique_identity(&self.store, identity)? {
            return Err(ParkingError::user_not_found(identity));
        }
        let bicycle = self
            .find_bicycle(serial)?
            .ok_or_else(|| ParkingError::bicycle_not_found(serial))?;
        if bicycle.owner_identity != identity {
            return Err(ParkingError::owner_mismatch(
                serial,
                &bicycle.owner_identity,
                identity,
            ));
        }

        let now = self.clock.now();
        let index = self.state_index()?;
        let state = index.state(serial);
        if !state.allows(action) {
            return Err(ParkingError::invalid_transition(
                serial,
                action.as_str(),
                &state.to_string(),
            ));
        }

        // Keep the log non-decreasing even if the wall clock went back
        let timestamp = index.newest_timestamp().map_or(now, |newest| now.max(newest));
        let event = MovementEvent::new(timestamp, action, serial, identity);
        self.store.append(&event)?;
        self.state_index()?.record(&event);

        tracing::info!(
            serial,
            identity,
            action = action.as_str(),
            timestamp = %event.formatted_timestamp(),
            "recorded movement"
        );
        Ok(event)
    }

    /// Delete a user who owns no bicycles
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no user has this identity
    /// - the user still owns bicycles
    /// - the store fails
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn delete_user(&mut self, identity: &str) -> Result<(), ParkingError> {
        if is_unique_identity(&self.store, identity)? {
            return Err(ParkingError::user_not_found(identity));
        }

        let owned = self.list_bicycles_for_user(identity)?;
        if !owned.is_empty() {
            return Err(ParkingError::user_has_bicycles(identity, owned.len()));
        }

        self.store.delete_where::<User>("identity", identity)?;

        tracing::info!(identity, "deleted user");
        Ok(())
    }

    /// Delete a bicycle
    ///
    /// Its movement history stays in the log.
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn delete_bicycle(&mut self, serial: &str) -> Result<(), ParkingError> {
        if is_unique_serial(&self.store, serial)? {
            return Err(ParkingError::bicycle_not_found(serial));
        }

        self.store.delete_where::<Bicycle>("serial", serial)?;

        tracing::info!(serial, "deleted bicycle");
        Ok(())
    }

    /// Serials of every bicycle owned by `identity`, in registration order
    pub fn list_bicycles_for_user(&self, identity: &str) -> Result<Vec<String>, ParkingError> {
        let bicycles: Vec<Bicycle> = self.store.scan()?;
        Ok(bicycles
            .into_iter()
            .filter(|bicycle| bicycle.owner_identity == identity)
            .map(|bicycle| bicycle.serial)
            .collect())
    }

    /// Current movement state of `serial`
    ///
    /// Serials without movements are reported as never entered, whether or
    /// not they are registered.
    pub fn bicycle_state(&mut self, serial: &str) -> Result<BicycleState, ParkingError> {
        Ok(self.state_index()?.state(serial))
    }

    fn find_bicycle(&self, serial: &str) -> Result<Option<Bicycle>, ParkingError> {
        let bicycles: Vec<Bicycle> = self.store.scan()?;
        Ok(bicycles.into_iter().find(|bicycle| bicycle.serial == serial))
    }

    /// Movement index, built from the log on first use
    fn state_index(&mut self) -> Result<&mut StateIndex, ParkingError> {
        if self.index.is_none() {
            let events: Vec<MovementEvent> = self.store.scan()?;
            tracing::debug!(events = events.len(), "built movement state index");
            self.index = Some(StateIndex::from_events(&events));
        }
        Ok(self.index.get_or_insert_with(StateIndex::new))
    }
}

/// Fail with [`ParkingError::EmptyField`] if `value` is empty
fn require(field: &'static str, value: &str) -> Result<(), ParkingError> {
    if is_empty(value) {
        return Err(ParkingError::empty_field(field));
    }
    Ok(())
}
