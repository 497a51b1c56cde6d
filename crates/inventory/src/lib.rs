//! Inventory core: stocked items and the concurrent store that mutates them.
//!
//! This crate holds the business rules (no IO, no printing, no logging).
//! Low-stock alerts leave through the `stockroom-events` observer registry.

pub mod item;
pub mod store;

pub use item::{StockItem, StockLevel};
pub use store::InventoryStore;
