use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::ItemId;

/// Payload delivered to observers when a mutation leaves an item below its
/// reorder threshold.
///
/// Events are facts: they describe the quantity observed right after the
/// mutation that triggered them, not whatever the item holds by the time an
/// observer gets to look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockEvent {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
    pub occurred_at: DateTime<Utc>,
}

impl LowStockEvent {
    pub const EVENT_TYPE: &'static str = "inventory.item.low_stock";

    pub fn new(
        item_id: ItemId,
        name: impl Into<String>,
        quantity: i64,
        reorder_threshold: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id,
            name: name.into(),
            quantity,
            reorder_threshold,
            occurred_at,
        }
    }

    /// Stable event name/type identifier.
    pub fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    /// How many units short of the threshold the item is. Positive for every
    /// event the store emits; an event built by hand may carry any values.
    pub fn shortfall(&self) -> i64 {
        self.reorder_threshold - self.quantity
    }
}
