//! Low-stock alerts as structured log records.

use tracing::warn;

use stockroom_events::{LowStockEvent, StockObserver};

/// Observer that turns each low-stock event into a `warn` record.
///
/// Cheap enough to register directly on the store; nothing here blocks beyond
/// the subscriber's own writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertObserver;

impl TracingAlertObserver {
    pub fn new() -> Self {
        Self
    }
}

impl StockObserver for TracingAlertObserver {
    fn on_low_stock(&self, event: &LowStockEvent) {
        warn!(
            event_type = event.event_type(),
            item_id = %event.item_id,
            name = %event.name,
            quantity = event.quantity,
            reorder_threshold = event.reorder_threshold,
            shortfall = event.shortfall(),
            occurred_at = %event.occurred_at,
            "low stock"
        );
    }
}
