//! Concurrent in-memory inventory.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use stockroom_core::{DomainError, DomainResult, ItemId, ObserverId};
use stockroom_events::{LowStockEvent, ObserverRegistry, StockObserver};

use crate::item::{StockItem, StockLevel};

#[derive(Debug)]
struct Slot {
    seq: u64,
    item: Arc<StockItem>,
}

#[derive(Debug, Default)]
struct Catalog {
    items: HashMap<ItemId, Slot>,
    next_seq: u64,
}

/// Keyed collection of [`StockItem`]s plus the observers that want to hear
/// about low stock.
///
/// ## Locking
///
/// - The catalog lock is held shared for lookups and exclusively only while
///   inserting a new key. It is never held during a quantity mutation.
/// - Each item serialises its own mutations; operations on different items
///   never wait for each other.
/// - Observers run after the item lock is released, on the caller's thread.
///
/// Items are handed out as `Arc<StockItem>`: there is exactly one live item
/// per identity, and changes through any handle are visible everywhere.
#[derive(Debug, Default)]
pub struct InventoryStore {
    catalog: RwLock<Catalog>,
    observers: ObserverRegistry,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new item. Exactly one of several concurrent adds for the same
    /// identity succeeds; the rest get `DuplicateProduct`.
    pub fn add_product(&self, item: StockItem) -> DomainResult<Arc<StockItem>> {
        let mut guard = self.write_catalog();
        let catalog = &mut *guard;

        match catalog.items.entry(item.id().clone()) {
            Entry::Occupied(existing) => Err(DomainError::duplicate(existing.key().as_str())),
            Entry::Vacant(slot) => {
                let item = Arc::new(item);
                slot.insert(Slot {
                    seq: catalog.next_seq,
                    item: Arc::clone(&item),
                });
                catalog.next_seq += 1;
                Ok(item)
            }
        }
    }

    /// Look up the live item for `id`.
    pub fn get_product(&self, id: &str) -> DomainResult<Arc<StockItem>> {
        self.read_catalog()
            .items
            .get(id)
            .map(|slot| Arc::clone(&slot.item))
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Record an inbound shipment. Returns the quantity after the shipment.
    pub fn receive_shipment(&self, id: &str, amount: i64) -> DomainResult<i64> {
        let item = self.get_product(id)?;
        let quantity = item.increase(amount)?;
        self.notify_if_low(&item, quantity);
        Ok(quantity)
    }

    /// Fulfil an order. Returns the quantity after the order.
    ///
    /// The availability check and the decrement are one critical section on
    /// the item; a failed check leaves the item unchanged and notifies nobody.
    pub fn fulfill_order(&self, id: &str, amount: i64) -> DomainResult<i64> {
        let item = self.get_product(id)?;
        let quantity = item.decrease(amount)?;
        self.notify_if_low(&item, quantity);
        Ok(quantity)
    }

    /// All items, in insertion order, as of the moment the catalog was read.
    pub fn list_products(&self) -> Vec<Arc<StockItem>> {
        let catalog = self.read_catalog();
        let mut slots: Vec<&Slot> = catalog.items.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| Arc::clone(&slot.item)).collect()
    }

    /// Value copies of every item, in insertion order.
    ///
    /// Each level is internally consistent; levels of different items may be
    /// read at slightly different instants under concurrent mutation.
    pub fn snapshot(&self) -> Vec<StockLevel> {
        self.list_products().iter().map(|item| item.level()).collect()
    }

    pub fn len(&self) -> usize {
        self.read_catalog().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_catalog().items.is_empty()
    }

    pub fn add_observer(&self, observer: Arc<dyn StockObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// `quantity` is the value the mutation itself produced, so every event
    /// reports the state its own mutation left behind.
    fn notify_if_low(&self, item: &StockItem, quantity: i64) {
        if !item.is_below_threshold(quantity) {
            return;
        }

        let event = LowStockEvent::new(
            item.id().clone(),
            item.name(),
            quantity,
            item.reorder_threshold(),
            Utc::now(),
        );
        self.observers.broadcast(&event);
    }

    fn read_catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_catalog(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_store() -> (InventoryStore, Arc<Mutex<Vec<LowStockEvent>>>) {
        let store = InventoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.add_observer(Arc::new(move |ev: &LowStockEvent| {
            sink.lock().unwrap().push(ev.clone());
        }));
        (store, seen)
    }

    #[test]
    fn laptop_scenario() {
        let (store, seen) = recording_store();
        store
            .add_product(StockItem::new("P1001", "Laptop", 5, 5).unwrap())
            .unwrap();

        assert_eq!(store.receive_shipment("P1001", 10).unwrap(), 15);
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(store.fulfill_order("P1001", 6).unwrap(), 9);
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(store.fulfill_order("P1001", 5).unwrap(), 4);
        {
            let events = seen.lock().unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].item_id.as_str(), "P1001");
            assert_eq!(events[0].name, "Laptop");
            assert_eq!(events[0].quantity, 4);
            assert_eq!(events[0].reorder_threshold, 5);
            assert_eq!(events[0].shortfall(), 1);
        }

        let err = store.fulfill_order("P1001", 100).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { available: 4, requested: 100, .. }));
        assert_eq!(store.get_product("P1001").unwrap().quantity(), 4);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn notification_uses_strict_less_than() {
        let (store, seen) = recording_store();
        store.add_product(StockItem::new("A", "Apple", 6, 5).unwrap()).unwrap();
        store.add_product(StockItem::new("B", "Banana", 6, 5).unwrap()).unwrap();

        store.fulfill_order("A", 1).unwrap();
        assert!(seen.lock().unwrap().is_empty(), "6 -> 5 must not notify");

        store.fulfill_order("B", 2).unwrap();
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item_id.as_str(), "B");
        assert_eq!(events[0].quantity, 4);
    }

    #[test]
    fn shipment_that_stays_low_still_notifies() {
        let (store, seen) = recording_store();
        store.add_product(StockItem::new("P1", "Cable", 0, 5).unwrap()).unwrap();
        assert!(seen.lock().unwrap().is_empty(), "construction never notifies");

        store.receive_shipment("P1", 2).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);

        store.receive_shipment("P1", 10).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_add_leaves_original_in_place() {
        let store = InventoryStore::new();
        store.add_product(StockItem::new("P1", "First", 1, 0).unwrap()).unwrap();

        let err = store
            .add_product(StockItem::new("P1", "Second", 99, 0).unwrap())
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateProduct("P1".to_string()));

        let item = store.get_product("P1").unwrap();
        assert_eq!(item.name(), "First");
        assert_eq!(item.quantity(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_ids_are_reported_without_side_effects() {
        let (store, seen) = recording_store();
        assert_eq!(
            store.get_product("nope").unwrap_err(),
            DomainError::ProductNotFound("nope".to_string())
        );
        assert!(matches!(
            store.receive_shipment("nope", 1),
            Err(DomainError::ProductNotFound(_))
        ));
        assert!(matches!(
            store.fulfill_order("nope", 1),
            Err(DomainError::ProductNotFound(_))
        ));
        assert!(store.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_amounts_fail_validation_and_do_not_notify() {
        let (store, seen) = recording_store();
        store.add_product(StockItem::new("P1", "Cable", 1, 5).unwrap()).unwrap();

        assert!(matches!(store.receive_shipment("P1", 0), Err(DomainError::Validation(_))));
        assert!(matches!(store.fulfill_order("P1", -3), Err(DomainError::Validation(_))));
        assert_eq!(store.get_product("P1").unwrap().quantity(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn get_product_returns_the_live_item() {
        let store = InventoryStore::new();
        store.add_product(StockItem::new("P1", "Cable", 1, 0).unwrap()).unwrap();

        let handle = store.get_product("P1").unwrap();
        handle.increase(4).unwrap();

        assert_eq!(store.get_product("P1").unwrap().quantity(), 5);
        assert!(Arc::ptr_eq(&handle, &store.get_product("P1").unwrap()));
    }

    #[test]
    fn listing_preserves_insertion_order() {
        let store = InventoryStore::new();
        for id in ["z", "a", "m"] {
            store.add_product(StockItem::new(id, id, 1, 0).unwrap()).unwrap();
        }
        let _ = store.add_product(StockItem::new("a", "dup", 1, 0).unwrap());

        let ids: Vec<String> = store
            .list_products()
            .iter()
            .map(|item| item.id().to_string())
            .collect();
        assert_eq!(ids, vec!["z", "a", "m"]);

        let levels = store.snapshot();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[1].name, "a");
    }

    #[test]
    fn removed_observer_stops_receiving() {
        let store = InventoryStore::new();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let id = store.add_observer(Arc::new(move |_: &LowStockEvent| {
            *sink.lock().unwrap() += 1;
        }));
        store.add_product(StockItem::new("P1", "Cable", 10, 5).unwrap()).unwrap();

        store.fulfill_order("P1", 6).unwrap();
        assert!(store.remove_observer(id));
        store.fulfill_order("P1", 1).unwrap();

        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(store.observers().is_empty());
    }

    #[test]
    fn observer_may_call_back_into_the_store() {
        let store = Arc::new(InventoryStore::new());
        store.add_product(StockItem::new("P1", "Cable", 10, 5).unwrap()).unwrap();

        let reentrant = Arc::clone(&store);
        let restocked = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&restocked);
        store.add_observer(Arc::new(move |ev: &LowStockEvent| {
            let mut done = flag.lock().unwrap();
            if !*done {
                *done = true;
                reentrant.receive_shipment(ev.item_id.as_str(), 20).unwrap();
            }
        }));

        assert_eq!(store.fulfill_order("P1", 8).unwrap(), 2);
        assert_eq!(store.get_product("P1").unwrap().quantity(), 22);
        assert!(*restocked.lock().unwrap());
    }
}
