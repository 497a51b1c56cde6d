use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use stockroom_cli::{demo, Console, ConsoleAlertObserver};
use stockroom_events::ChannelObserver;
use stockroom_infra::{AlertWorker, FlatFileStore, WarehouseConfig};
use stockroom_inventory::InventoryStore;
use stockroom_observability::TracingAlertObserver;

fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = WarehouseConfig::from_env();
    info!(?config, "starting warehouse console");

    let store = InventoryStore::new();
    let persistence = FlatFileStore::new(&config.data_file);

    // Load previous state if available.
    persistence
        .load(&store)
        .with_context(|| format!("failed to load {}", config.data_file.display()))?;

    store.add_observer(Arc::new(ConsoleAlertObserver::stdout()));

    let alert_worker = if config.log_alerts {
        let (channel, subscription) = ChannelObserver::new();
        store.add_observer(Arc::new(channel));
        let handle = AlertWorker::spawn("alert-log", subscription, TracingAlertObserver::new())
            .context("failed to spawn alert worker")?;
        Some(handle)
    } else {
        None
    };

    if config.seed_demo && store.is_empty() {
        if let Err(err) = demo::seed(&store) {
            warn!(error = %err, "demo seed failed");
        }
    }

    if config.run_simulation {
        println!("Starting demo simulation (multithreaded) ...");
        for outcome in demo::run_simulation(&store, demo::DEMO_ITEM, &demo::default_steps()) {
            println!("{outcome}");
        }
        println!("Demo simulation finished.");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(&store)
        .run(stdin.lock(), &mut stdout.lock())
        .context("console i/o failed")?;

    let report = persistence
        .save(&store)
        .with_context(|| format!("failed to save {}", config.data_file.display()))?;
    println!(
        "Inventory saved to {} ({} items)",
        config.data_file.display(),
        report.written
    );

    if let Some(worker) = alert_worker {
        worker.shutdown();
    }

    Ok(())
}
