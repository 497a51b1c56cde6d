//! Command surface for the warehouse: console, alert printing, demo runs.
//!
//! Everything user-facing lives here; the inventory core never prints.

pub mod alert;
pub mod command;
pub mod console;
pub mod demo;

pub use alert::ConsoleAlertObserver;
pub use command::{Command, ParseCommandError};
pub use console::{Console, Flow};
