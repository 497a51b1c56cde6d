//! Thread-safe observer list with snapshot broadcast.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use stockroom_core::ObserverId;

use crate::event::LowStockEvent;
use crate::observer::StockObserver;

#[derive(Clone)]
struct Registration {
    id: ObserverId,
    observer: Arc<dyn StockObserver>,
}

/// Outcome of one broadcast.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Observers whose callback returned normally.
    pub delivered: usize,
    /// Observers whose callback panicked.
    pub failed: usize,
}

/// Registered low-stock observers, in registration order.
///
/// - Copy-on-write: registration swaps in a new list, broadcasts iterate the
///   list that was current when they started
/// - No deduplication: the same observer added twice is called twice
/// - Panicking observers are isolated from each other and from the caller
pub struct ObserverRegistry {
    observers: RwLock<Arc<Vec<Registration>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. The returned id deregisters exactly this
    /// registration.
    pub fn add(&self, observer: Arc<dyn StockObserver>) -> ObserverId {
        let id = ObserverId::new();
        let mut guard = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Registration { id, observer });
        *guard = Arc::new(next);
        id
    }

    /// Deregister an observer. Returns `false` if the id was unknown (or
    /// already removed).
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut guard = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.iter().any(|r| r.id == id) {
            return false;
        }
        let next: Vec<Registration> = guard.iter().filter(|r| r.id != id).cloned().collect();
        *guard = Arc::new(next);
        true
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Deliver `event` to every observer registered at call time.
    ///
    /// Registrations added or removed while this runs take effect from the
    /// next broadcast on.
    pub fn broadcast(&self, event: &LowStockEvent) -> BroadcastReport {
        let snapshot = self.current();
        let mut report = BroadcastReport::default();

        for reg in snapshot.iter() {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| reg.observer.on_low_stock(event)));
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    report.failed += 1;
                    warn!(
                        observer_id = %reg.id,
                        item_id = %event.item_id,
                        panic = panic_message(payload.as_ref()),
                        "low-stock observer panicked"
                    );
                }
            }
        }

        report
    }

    fn current(&self) -> Arc<Vec<Registration>> {
        // The lock only guards an Arc swap, so a poisoned lock still holds a
        // complete list.
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self {
            observers: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl core::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let ids: Vec<ObserverId> = self.current().iter().map(|r| r.id).collect();
        f.debug_struct("ObserverRegistry").field("observers", &ids).finish()
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
