//! In-memory record store
//!
//! Keeps rows per record kind in a HashMap. Rows go through the same serde
//! encoding as the CSV store, so a record that round-trips here round-trips
//! on disk too. Used by tests and benchmarks.

use super::record::{decode, decode_error, encode, Record, RecordKind};
use super::traits::{column_for, RecordStore};
use crate::types::ParkingError;
use csv::StringRecord;
use std::collections::HashMap;

/// Record store backed by process memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Rows per kind, in insertion order
    rows: HashMap<RecordKind, Vec<StringRecord>>,

    /// Number of successful appends, across all kinds
    appends: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored for `kind`
    pub fn len(&self, kind: RecordKind) -> usize {
        self.rows.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(Vec::is_empty)
    }

    /// Total number of appends performed since creation
    pub fn append_count(&self) -> usize {
        self.appends
    }
}

impl RecordStore for MemoryStore {
    fn append<R: Record>(&mut self, record: &R) -> Result<(), ParkingError> {
        let row = encode(record)?;
        self.rows.entry(R::KIND).or_default().push(row);
        self.appends += 1;
        Ok(())
    }

    fn scan<R: Record>(&self) -> Result<Vec<R>, ParkingError> {
        let Some(rows) = self.rows.get(&R::KIND) else {
            return Ok(Vec::new());
        };

        rows.iter()
            .enumerate()
            .map(|(i, row)| decode(row).map_err(|e| decode_error(R::KIND, Some(i as u64 + 1), e)))
            .collect()
    }

    fn delete_where<R: Record>(&mut self, field: &str, value: &str) -> Result<usize, ParkingError> {
        let column = column_for::<R>(field)?;
        let Some(rows) = self.rows.get_mut(&R::KIND) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| row.get(column) != Some(value));
        Ok(before - rows.len())
    }
}
