use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use stockroom_events::{LowStockEvent, StockObserver};

/// Prints a one-line alert per low-stock event.
pub struct ConsoleAlertObserver {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleAlertObserver {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl StockObserver for ConsoleAlertObserver {
    fn on_low_stock(&self, event: &LowStockEvent) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout must not turn into a failed order.
        let _ = writeln!(out, "{}", format_alert(event));
        let _ = out.flush();
    }
}

pub fn format_alert(event: &LowStockEvent) -> String {
    format!(
        "[ALERT] Low stock for {} (ID: {}) - only {} left!",
        event.name, event.item_id, event.quantity
    )
}
