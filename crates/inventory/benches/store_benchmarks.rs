use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::{Arc, Mutex};
use std::thread;

use stockroom_events::LowStockEvent;
use stockroom_inventory::{InventoryStore, StockItem};

/// Naive alternative: one lock around the whole map (what per-item locking
/// is meant to beat under contention).
#[derive(Debug, Default)]
struct GlobalLockStore {
    inner: Mutex<std::collections::HashMap<String, i64>>,
}

impl GlobalLockStore {
    fn add(&self, id: &str, qty: i64) {
        self.inner.lock().unwrap().insert(id.to_string(), qty);
    }

    fn ship_then_order(&self, id: &str) {
        let mut map = self.inner.lock().unwrap();
        if let Some(q) = map.get_mut(id) {
            *q += 1;
            *q -= 1;
        }
    }
}

fn seeded_store(items: usize) -> Arc<InventoryStore> {
    let store = Arc::new(InventoryStore::new());
    for i in 0..items {
        let item = StockItem::new(format!("P{i}"), format!("Item {i}"), 1_000_000, 0).unwrap();
        store.add_product(item).unwrap();
    }
    store
}

fn bench_single_thread_ops(c: &mut Criterion) {
    let store = seeded_store(1);
    let mut group = c.benchmark_group("single_thread");
    group.throughput(Throughput::Elements(2));

    group.bench_function("ship_then_order", |b| {
        b.iter(|| {
            store.receive_shipment(black_box("P0"), 1).unwrap();
            store.fulfill_order(black_box("P0"), 1).unwrap();
        })
    });

    let notifying = seeded_store(0);
    notifying
        .add_product(StockItem::new("LOW", "Low", 1_000_000, i64::MAX).unwrap())
        .unwrap();
    notifying.add_observer(Arc::new(|ev: &LowStockEvent| {
        black_box(ev.quantity);
    }));
    group.bench_function("ship_then_order_with_alert", |b| {
        b.iter(|| {
            notifying.receive_shipment(black_box("LOW"), 1).unwrap();
            notifying.fulfill_order(black_box("LOW"), 1).unwrap();
        })
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    const THREADS: usize = 4;
    const OPS: usize = 1_000;

    let mut group = c.benchmark_group("contention");
    group.throughput(Throughput::Elements((THREADS * OPS) as u64));

    for items in [1usize, THREADS] {
        let store = seeded_store(items);
        group.bench_with_input(BenchmarkId::new("per_item_lock", items), &items, |b, &items| {
            b.iter(|| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|t| {
                        let store = Arc::clone(&store);
                        let id = format!("P{}", t % items);
                        thread::spawn(move || {
                            for _ in 0..OPS {
                                store.receive_shipment(&id, 1).unwrap();
                                store.fulfill_order(&id, 1).unwrap();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            })
        });

        let global = Arc::new(GlobalLockStore::default());
        for i in 0..items {
            global.add(&format!("P{i}"), 1_000_000);
        }
        group.bench_with_input(BenchmarkId::new("global_lock", items), &items, |b, &items| {
            b.iter(|| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|t| {
                        let global = Arc::clone(&global);
                        let id = format!("P{}", t % items);
                        thread::spawn(move || {
                            for _ in 0..OPS {
                                global.ship_then_order(&id);
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread_ops, bench_contention);
criterion_main!(benches);
