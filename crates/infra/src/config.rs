//! Process configuration from environment variables.

use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "inventory.txt";

/// Runtime configuration for the warehouse process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Flat file loaded at startup and written on exit.
    pub data_file: PathBuf,
    /// Seed the `P1001` demo item when nothing was loaded.
    pub seed_demo: bool,
    /// Run the multithreaded shipment/order simulation before the console.
    pub run_simulation: bool,
    /// Also deliver alerts as log records through a background worker.
    pub log_alerts: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            seed_demo: true,
            run_simulation: false,
            log_alerts: false,
        }
    }
}

impl WarehouseConfig {
    /// Read configuration from the process environment.
    ///
    /// - `STOCKROOM_DATA_FILE` (default `inventory.txt`)
    /// - `STOCKROOM_SEED_DEMO` (default `true`)
    /// - `STOCKROOM_RUN_SIMULATION` (default `false`)
    /// - `STOCKROOM_LOG_ALERTS` (default `false`)
    ///
    /// Unparseable booleans fall back to their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(default)
        };

        Self {
            data_file: lookup("STOCKROOM_DATA_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            seed_demo: flag("STOCKROOM_SEED_DEMO", defaults.seed_demo),
            run_simulation: flag("STOCKROOM_RUN_SIMULATION", defaults.run_simulation),
            log_alerts: flag("STOCKROOM_LOG_ALERTS", defaults.log_alerts),
        }
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    pub fn with_seed_demo(mut self, seed: bool) -> Self {
        self.seed_demo = seed;
        self
    }

    pub fn with_simulation(mut self, run: bool) -> Self {
        self.run_simulation = run;
        self
    }

    pub fn with_log_alerts(mut self, enabled: bool) -> Self {
        self.log_alerts = enabled;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
