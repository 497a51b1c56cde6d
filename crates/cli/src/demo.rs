//! Demo data and a small multithreaded shipment/order simulation.

use std::fmt;
use std::thread;
use std::time::Duration;

use stockroom_core::{DomainError, DomainResult};
use stockroom_inventory::{InventoryStore, StockItem};

pub const DEMO_ITEM: &str = "P1001";

/// Stock the demo laptop: created empty (below its threshold of 5), then
/// brought to 10 by a shipment.
pub fn seed(store: &InventoryStore) -> DomainResult<()> {
    store.add_product(StockItem::new(DEMO_ITEM, "Laptop", 0, 5)?)?;
    store.receive_shipment(DEMO_ITEM, 10)?;
    Ok(())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepKind {
    Shipment,
    Order,
}

/// One scheduled operation in the simulation.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub kind: StepKind,
    pub amount: i64,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub result: DomainResult<i64>,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.step.kind, &self.result) {
            (StepKind::Shipment, Ok(_)) => {
                write!(f, "Received shipment of {} laptops", self.step.amount)
            }
            (StepKind::Order, Ok(_)) => write!(f, "Fulfilled {} laptop orders", self.step.amount),
            (StepKind::Shipment, Err(e)) => write!(f, "Shipment failed in demo: {e}"),
            (StepKind::Order, Err(e)) => write!(f, "Order failed in demo: {e}"),
        }
    }
}

/// Ship 5, order 6, order 5 against the demo item, each from its own thread
/// with a staggered start.
pub fn default_steps() -> Vec<Step> {
    vec![
        Step {
            kind: StepKind::Shipment,
            amount: 5,
            delay: Duration::from_millis(30),
        },
        Step {
            kind: StepKind::Order,
            amount: 6,
            delay: Duration::from_millis(50),
        },
        Step {
            kind: StepKind::Order,
            amount: 5,
            delay: Duration::from_millis(60),
        },
    ]
}

/// Run `steps` concurrently against `item_id`. Outcomes come back in step
/// order, regardless of completion order.
pub fn run_simulation(store: &InventoryStore, item_id: &str, steps: &[Step]) -> Vec<StepOutcome> {
    thread::scope(|scope| {
        let handles: Vec<_> = steps
            .iter()
            .map(|step| {
                let step = *step;
                scope.spawn(move || {
                    thread::sleep(step.delay);
                    let result = match step.kind {
                        StepKind::Shipment => store.receive_shipment(item_id, step.amount),
                        StepKind::Order => store.fulfill_order(item_id, step.amount),
                    };
                    StepOutcome { step, result }
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(steps)
            .map(|(h, step)| match h.join() {
                Ok(outcome) => outcome,
                Err(_) => StepOutcome {
                    step: *step,
                    result: Err(DomainError::validation("simulation worker panicked")),
                },
            })
            .collect()
    })
}
