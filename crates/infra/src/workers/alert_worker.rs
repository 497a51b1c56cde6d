use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use stockroom_events::{LowStockEvent, StockObserver, Subscription};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    ///
    /// Events already queued when shutdown is observed are still delivered.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Wait for the worker to stop on its own (all senders dropped).
    pub fn join(mut self) {
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Delivers low-stock events to a slow observer off the mutating threads.
///
/// Pair it with a [`ChannelObserver`](stockroom_events::ChannelObserver)
/// registered on the store: the store only pays for a channel send, and this
/// worker absorbs whatever time the real sink takes.
#[derive(Debug)]
pub struct AlertWorker;

impl AlertWorker {
    /// Spawn a named worker thread draining `subscription` into `observer`.
    pub fn spawn<O>(
        name: &'static str,
        subscription: Subscription<LowStockEvent>,
        observer: O,
    ) -> std::io::Result<WorkerHandle>
    where
        O: StockObserver + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, subscription, shutdown_rx, &observer))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<O>(
    name: &'static str,
    sub: Subscription<LowStockEvent>,
    shutdown_rx: mpsc::Receiver<()>,
    observer: &O,
) where
    O: StockObserver,
{
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            // Drain what is already queued, then stop.
            while let Ok(event) = sub.try_recv() {
                deliver(name, observer, &event);
            }
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(event) => deliver(name, observer, &event),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker = name, "alert worker stopped");
}

fn deliver<O: StockObserver>(name: &'static str, observer: &O, event: &LowStockEvent) {
    if panic::catch_unwind(AssertUnwindSafe(|| observer.on_low_stock(event))).is_err() {
        warn!(worker = name, item_id = %event.item_id, "alert observer panicked");
    }
}
