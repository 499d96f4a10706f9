//! Subscriber setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or a JSON fmt layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log filter {:?}: {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}
