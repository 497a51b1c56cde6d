use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

/// A single stocked product: immutable identity plus a guarded quantity.
///
/// All quantity access goes through one mutex owned by the item, so a
/// check-then-write (see [`StockItem::decrease`]) is indivisible with respect
/// to every other mutation of the same item, while different items never
/// contend with each other.
#[derive(Debug)]
pub struct StockItem {
    id: ItemId,
    name: String,
    reorder_threshold: i64,
    quantity: Mutex<i64>,
}

/// Point-in-time copy of a [`StockItem`]'s fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
}

impl StockItem {
    /// Create an item.
    ///
    /// Fails with `Validation` if the id or name is empty, or if the initial
    /// quantity or threshold is negative. An item created below its threshold
    /// is not "low" until a mutation says so.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        initial_quantity: i64,
        reorder_threshold: i64,
    ) -> DomainResult<Self> {
        let id = ItemId::new(id)?;
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::validation("product name required"));
        }
        if initial_quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if reorder_threshold < 0 {
            return Err(DomainError::validation("threshold cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            reorder_threshold,
            quantity: Mutex::new(initial_quantity),
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reorder_threshold(&self) -> i64 {
        self.reorder_threshold
    }

    /// Current quantity, read under the same lock as the mutators.
    pub fn quantity(&self) -> i64 {
        *self.lock()
    }

    /// Add `amount` units. Returns the quantity right after the addition.
    pub fn increase(&self, amount: i64) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::validation("increase amount must be positive"));
        }

        let mut qty = self.lock();
        let next = qty
            .checked_add(amount)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        *qty = next;
        Ok(next)
    }

    /// Remove `amount` units. Returns the quantity right after the removal.
    ///
    /// The availability check and the write happen under one lock
    /// acquisition; on `InsufficientStock` the quantity is untouched.
    pub fn decrease(&self, amount: i64) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::validation("decrease amount must be positive"));
        }

        let mut qty = self.lock();
        if amount > *qty {
            return Err(DomainError::insufficient(
                self.id.as_str(),
                &self.name,
                *qty,
                amount,
            ));
        }
        *qty -= amount;
        Ok(*qty)
    }

    /// Low-stock rule: strictly below the threshold.
    pub fn is_below_threshold(&self, quantity: i64) -> bool {
        quantity < self.reorder_threshold
    }

    pub fn level(&self) -> StockLevel {
        StockLevel {
            id: self.id.clone(),
            name: self.name.clone(),
            quantity: self.quantity(),
            reorder_threshold: self.reorder_threshold,
        }
    }

    fn lock(&self) -> MutexGuard<'_, i64> {
        // Critical sections never panic between check and write, so a
        // poisoned guard still holds a valid quantity.
        self.quantity.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Display for StockItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Product{{id='{}', name='{}', quantity={}, threshold={}}}",
            self.id,
            self.name,
            self.quantity(),
            self.reorder_threshold
        )
    }
}
