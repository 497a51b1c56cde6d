//! Infrastructure layer: configuration, file persistence, background alert
//! delivery.

pub mod config;
pub mod persistence;
pub mod workers;

pub use config::WarehouseConfig;
pub use persistence::{FlatFileStore, LoadReport, PersistenceError, SaveReport};
pub use workers::{AlertWorker, WorkerHandle};
