//! Record store abstraction
//!
//! The domain rules only need three operations from persistence. Any backend
//! offering them (CSV files, memory, a database) can be plugged in.

use super::record::Record;
use crate::types::ParkingError;

/// Persistence contract consumed by the domain rules
///
/// Records of each kind are kept in insertion order. Implementations report
/// every failure as a [`ParkingError`] with [`crate::types::ErrorKind::Storage`].
pub trait RecordStore {
    /// Add one record of kind `R`
    fn append<R: Record>(&mut self, record: &R) -> Result<(), ParkingError>;

    /// Read every record of kind `R`, in insertion order
    fn scan<R: Record>(&self) -> Result<Vec<R>, ParkingError>;

    /// Remove every record of kind `R` whose `field` equals `value`
    ///
    /// Returns the number of removed records. Unknown field names fail with
    /// [`ParkingError::UnknownField`].
    fn delete_where<R: Record>(&mut self, field: &str, value: &str) -> Result<usize, ParkingError>;
}

/// Resolve `field` to a column index for kind `R`
pub(crate) fn column_for<R: Record>(field: &str) -> Result<usize, ParkingError> {
    R::KIND
        .field_index(field)
        .ok_or_else(|| ParkingError::UnknownField {
            kind: R::KIND.name(),
            field: field.to_string(),
        })
}
