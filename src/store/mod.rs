//! Record store module
//!
//! Persistence for users, bicycles and movement events.
//!
//! # Components
//!
//! - `record` - Record kinds, headers and row conversion
//! - `traits` - The `RecordStore` contract used by the domain rules
//! - `csv_store` - One CSV file per record kind
//! - `memory` - In-memory store for tests and benchmarks

pub mod csv_store;
pub mod memory;
pub mod record;
pub mod traits;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;
pub use record::{Record, RecordKind};
pub use traits::RecordStore;
