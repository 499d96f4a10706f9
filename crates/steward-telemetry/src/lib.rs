//! # Steward Telemetry
//!
//! Observability for the coordinator: structured logs through
//! `tracing-subscriber` and Prometheus counters in a process-wide registry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use steward_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STEWARD_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `STEWARD_JSON_LOGS` | `false` | JSON formatted logs |
//! | `STEWARD_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `STEWARD_SERVICE_NAME` | `steward` | Service name in the startup log |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, DECODE_FAILURES, DEVICES_REGISTERED, DEVICES_UNREGISTERED,
    DISCOVERY_ABANDONED, INBOUND_EVENTS, NOTIFICATIONS_DROPPED, TRANSPORT_ERRORS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
