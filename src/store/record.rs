//! Row format for persisted records
//!
//! This module centralizes the on-disk shape of every record kind:
//! - the header (column names) of each kind
//! - serde-based conversion between domain types and CSV rows
//! - mapping of decoding failures to [`ParkingError`]
//!
//! All functions are pure (no I/O) so every store implementation shares them.

use crate::types::{Bicycle, MovementEvent, ParkingError, User};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The three kinds of persisted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Bicycle,
    Movement,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::User, RecordKind::Bicycle, RecordKind::Movement];

    /// Singular name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Bicycle => "bicycle",
            RecordKind::Movement => "movement",
        }
    }

    /// Column names, in persisted order
    ///
    /// These match the serde field names of the record type.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            RecordKind::User => &["identity", "name", "email"],
            RecordKind::Bicycle => &["serial", "owner_identity", "brand", "model"],
            RecordKind::Movement => &["timestamp", "action", "serial", "owner_identity"],
        }
    }

    pub fn header_record(&self) -> StringRecord {
        StringRecord::from(self.header().to_vec())
    }

    /// Position of `field` in the header, if the kind has it
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.header().iter().position(|column| *column == field)
    }
}

/// A domain type persisted as one CSV row through serde
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;
}

impl Record for Bicycle {
    const KIND: RecordKind = RecordKind::Bicycle;
}

impl Record for MovementEvent {
    const KIND: RecordKind = RecordKind::Movement;
}

/// Serialize `record` into a standalone row
pub(crate) fn encode<R: Record>(record: &R) -> Result<StringRecord, ParkingError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(record)?;
    let bytes = writer.into_inner().map_err(|e| ParkingError::Storage {
        message: e.to_string(),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice());
    let mut row = StringRecord::new();
    reader.read_record(&mut row)?;
    Ok(row)
}

/// Deserialize a row of kind `R`, matching columns by header name
pub(crate) fn decode<R: Record>(row: &StringRecord) -> Result<R, csv::Error> {
    let header = R::KIND.header_record();
    row.deserialize(Some(&header))
}

/// Turn a csv failure while reading records of `kind` into a [`ParkingError`]
///
/// I/O failures stay plain storage errors. Anything else means the row is
/// malformed; the line comes from the reader, or `fallback_line` when the row
/// has no position.
pub(crate) fn decode_error(kind: RecordKind, fallback_line: Option<u64>, error: csv::Error) -> ParkingError {
    if error.is_io_error() {
        return error.into();
    }

    let line = error.position().map(|pos| pos.line()).or(fallback_line);
    let message = match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => error.to_string(),
    };
    ParkingError::malformed_record(kind.name(), line, &message)
}
