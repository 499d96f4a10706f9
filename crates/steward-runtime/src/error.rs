//! Runtime errors.

use shared_types::TransportError;
use steward_telemetry::TelemetryError;
use thiserror::Error;
use zs_03_device_registry::StoreError;
use zs_04_requests::RequestError;

use crate::container::config::ConfigError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Device database error: {0}")]
    Store(#[from] StoreError),

    /// The transport could not be started.
    #[error("Transport failed to start: {0}")]
    Transport(#[from] TransportError),

    /// The radio never confirmed a reset.
    #[error("Radio reset failed: {0}")]
    Reset(#[source] RequestError),

    /// A mandatory startup command was rejected or could not be sent.
    #[error("Startup step {step} failed: {source}")]
    Startup {
        step: &'static str,
        #[source]
        source: TransportError,
    },
}
