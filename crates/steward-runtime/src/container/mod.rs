//! Configuration and the runtime container.

pub mod config;
pub mod runtime;

pub use config::{
    ConfigError, NetworkConfig, QueueConfig, SerialConfig, StewardConfig, StorageConfig,
};
pub use runtime::{Lifecycle, StewardRuntime};
