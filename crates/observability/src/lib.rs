//! Tracing/logging setup and log-based alerting.

pub mod alert;
pub mod tracing;

pub use alert::TracingAlertObserver;
pub use self::tracing::LogFormat;

/// Initialize process-wide logging with the format chosen by
/// `STOCKROOM_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}
