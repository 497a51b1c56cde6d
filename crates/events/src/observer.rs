//! Low-stock observer capability.

use crate::event::LowStockEvent;

/// Sink for low-stock events.
///
/// The inventory store depends only on this capability, never on a concrete
/// alerting mechanism. Implementations may print, log, enqueue, or page
/// someone; the store does not care.
///
/// ## Contract
///
/// - Called on the mutating caller's thread, after the item lock is released.
/// - Should return quickly. Slow work belongs behind a
///   [`ChannelObserver`](crate::ChannelObserver).
/// - A panic is caught by the registry and does not reach the caller or the
///   observers registered after this one.
///
/// Any `Fn(&LowStockEvent) + Send + Sync` closure is an observer:
///
/// ```ignore
/// store.add_observer(Arc::new(|ev: &LowStockEvent| println!("{}", ev.item_id)));
/// ```
pub trait StockObserver: Send + Sync {
    fn on_low_stock(&self, event: &LowStockEvent);
}

impl<F> StockObserver for F
where
    F: Fn(&LowStockEvent) + Send + Sync,
{
    fn on_low_stock(&self, event: &LowStockEvent) {
        self(event)
    }
}
