//! # Steward Runtime
//!
//! Assembles the gateway subsystems around a coordinator transport.
//!
//! ## Responsibilities
//!
//! - **Configuration** (`container::config`): YAML file plus `STEWARD_*`
//!   environment overrides
//! - **Wiring** (`wiring`): the inbound pump, sole reader of the transport
//!   event stream
//! - **Startup** (`startup`): radio reset and network formation
//! - **Container** (`container::runtime`): owns every subsystem and task
//!
//! ## Usage
//!
//! ```ignore
//! let config = StewardConfig::load("steward.yaml")?;
//! steward_telemetry::init_telemetry(&TelemetryConfig::from_env())?;
//! let mut runtime = StewardRuntime::start(config, transport, codec).await?;
//! let mut notifications = runtime.take_notifications().unwrap();
//! while let Some(device) = notifications.registered.recv().await {
//!     runtime.requests().toggle(device.network_address, 1).await?;
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod error;
pub mod startup;
pub mod wiring;

pub use container::{
    ConfigError, Lifecycle, NetworkConfig, QueueConfig, SerialConfig, StewardConfig,
    StewardRuntime, StorageConfig,
};
pub use error::RuntimeError;
pub use startup::{coordinator_endpoints, CoordinatorInfo, CoordinatorStartup};
pub use wiring::{log_transport_errors, translate, InboundPump};
