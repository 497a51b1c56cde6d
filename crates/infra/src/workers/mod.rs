//! Background workers.

pub mod alert_worker;

pub use alert_worker::{AlertWorker, WorkerHandle};
