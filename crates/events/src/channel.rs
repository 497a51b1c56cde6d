//! Hand-off observer: moves alert work off the mutating thread.
//!
//! A `ChannelObserver` only enqueues the event; the paired [`Subscription`] is
//! drained elsewhere (typically by a background worker). A slow or hung alert
//! sink behind the channel therefore never holds up shipments or orders.
//!
//! ```ignore
//! let (observer, subscription) = ChannelObserver::new();
//! store.add_observer(Arc::new(observer));
//!
//! loop {
//!     match subscription.recv_timeout(Duration::from_secs(1)) {
//!         Ok(event) => page_purchasing(event),
//!         Err(RecvTimeoutError::Timeout) => continue,      // check for shutdown
//!         Err(RecvTimeoutError::Disconnected) => break,    // observer dropped
//!     }
//! }
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::event::LowStockEvent;
use crate::observer::StockObserver;

/// Receiving end of a [`ChannelObserver`].
///
/// Designed for single-threaded consumption; messages arrive in broadcast
/// order per publishing thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Observer that forwards each low-stock event onto an unbounded channel.
///
/// Once the subscription is dropped, events are discarded silently.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<LowStockEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Subscription<LowStockEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { sender: tx }, Subscription::new(rx))
    }
}

impl StockObserver for ChannelObserver {
    fn on_low_stock(&self, event: &LowStockEvent) {
        let _ = self.sender.send(event.clone());
    }
}
