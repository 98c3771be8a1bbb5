//! Telemetry: structured logging and metrics.
//!
//! - **Logging**: JSON/pretty/compact output through `tracing-subscriber`
//! - **Metrics**: command and error counters through the `metrics` facade
//!
//! # Example
//!
//! ```rust,no_run
//! use tutor_core::telemetry::{init_telemetry, LoggingConfig};
//!
//! init_telemetry(&LoggingConfig::default()).expect("Failed to initialize telemetry");
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat, LoggingConfig};

/// Initialize logging and register metric descriptions. Call once at startup.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed.
pub fn init_telemetry(config: &LoggingConfig) -> anyhow::Result<()> {
    metrics::describe_metrics();
    init_logging(config)?;
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        "Telemetry initialized"
    );
    Ok(())
}
