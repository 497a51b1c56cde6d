//! Snapshot persistence adapters.

pub mod flat_file;

pub use flat_file::{FlatFileStore, LoadReport, PersistenceError, SaveReport};
