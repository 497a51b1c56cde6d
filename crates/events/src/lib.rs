//! Low-stock events and the observer machinery that delivers them.
//!
//! The inventory store builds a [`LowStockEvent`] after a mutation and hands it
//! to an [`ObserverRegistry`]. Nothing in this crate knows how stock is kept.

pub mod channel;
pub mod event;
pub mod observer;
pub mod registry;

pub use channel::{ChannelObserver, Subscription};
pub use event::LowStockEvent;
pub use observer::StockObserver;
pub use registry::{BroadcastReport, ObserverRegistry};
