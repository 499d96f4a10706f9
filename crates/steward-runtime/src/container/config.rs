//! # Steward Configuration
//!
//! Unified configuration for the radio link, the network the coordinator
//! forms, storage and the internal queues.
//!
//! Loaded from YAML; every section and field is optional and falls back to
//! its default. `STEWARD_*` environment variables override the file.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `STEWARD_SERIAL_PORT` | `serial.port_name` |
//! | `STEWARD_BAUD_RATE` | `serial.baud_rate` |
//! | `STEWARD_PERMIT_JOIN` | `network.permit_join` |
//! | `STEWARD_PAN_ID` | `network.pan_id` (`0x1a62` or decimal) |
//! | `STEWARD_CHANNELS` | `network.channels` (`11,15,20`) |
//! | `STEWARD_LED` | `network.led` |
//! | `STEWARD_DATABASE_PATH` | `storage.database_path` |

use serde::{Deserialize, Serialize};
use shared_types::{ChannelMask, IeeeAddress};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zs_01_correlation::RetryPolicy;
use zs_04_requests::RequestPolicy;
use zs_05_lifecycle::{NotificationCapacities, DEFAULT_REGISTRATION_QUEUE};

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StewardConfig {
    /// Serial link to the coordinator radio.
    pub serial: SerialConfig,
    /// Network formed by the coordinator.
    pub network: NetworkConfig,
    /// Device database.
    pub storage: StorageConfig,
    /// Timeouts and retries of request operations.
    pub requests: RequestPolicy,
    /// Capacities of internal queues.
    pub queues: QueueConfig,
}

impl StewardConfig {
    /// Read a YAML file without applying overrides.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// File, then environment overrides, then validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_yaml_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STEWARD_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("STEWARD_SERIAL_PORT") {
            self.serial.port_name = port;
        }
        if let Some(value) = lookup("STEWARD_BAUD_RATE") {
            self.serial.baud_rate = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::env("STEWARD_BAUD_RATE", &value))?;
        }
        if let Some(value) = lookup("STEWARD_PERMIT_JOIN") {
            self.network.permit_join = parse_flag("STEWARD_PERMIT_JOIN", &value)?;
        }
        if let Some(value) = lookup("STEWARD_PAN_ID") {
            self.network.pan_id = parse_pan_id(&value)?;
        }
        if let Some(value) = lookup("STEWARD_CHANNELS") {
            self.network.channels = value
                .split(',')
                .map(|c| c.trim().parse::<u8>())
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| ConfigError::env("STEWARD_CHANNELS", &value))?;
        }
        if let Some(value) = lookup("STEWARD_LED") {
            self.network.led = parse_flag("STEWARD_LED", &value)?;
        }
        if let Some(path) = lookup("STEWARD_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Reject values the radio or the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.port_name.trim().is_empty() {
            return Err(ConfigError::Invalid("serial.port_name is empty".into()));
        }
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::Invalid("serial.baud_rate must be positive".into()));
        }
        if self.network.channels.is_empty() {
            return Err(ConfigError::Invalid("network.channels is empty".into()));
        }
        self.network.channel_mask()?;
        if self.network.pan_id == 0xFFFF {
            return Err(ConfigError::Invalid("network.pan_id 0xffff is reserved".into()));
        }
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.database_path is empty".into()));
        }
        check_policy("requests.default", &self.requests.default)?;
        check_policy("requests.reset", &self.requests.reset)?;
        self.queues.validate()
    }
}

/// Serial link settings, handed to the transport as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
        }
    }
}

/// Parameters of the network the coordinator forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Allow new devices to join after startup.
    pub permit_join: bool,
    /// Extended address the coordinator takes.
    pub ieee_address: IeeeAddress,
    pub pan_id: u16,
    /// Pre-configured network key.
    pub network_key: [u8; 16],
    /// Radio channels, each in 11..=26.
    pub channels: Vec<u8>,
    /// Coordinator LED state.
    pub led: bool,
}

impl NetworkConfig {
    pub fn channel_mask(&self) -> Result<ChannelMask, ConfigError> {
        ChannelMask::from_channels(&self.channels).map_err(ConfigError::Channel)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            permit_join: false,
            ieee_address: IeeeAddress(0x0012_4b00_019c_2ee9),
            pan_id: 0x1A62,
            network_key: [1, 3, 5, 7, 9, 11, 13, 15, 0, 2, 4, 6, 8, 10, 12, 13],
            channels: vec![11],
            led: false,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON device database, created on first save.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("devices.json"),
        }
    }
}

/// Queue capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Broadcast dispatcher ring size.
    pub bus: usize,
    /// Announces waiting for discovery.
    pub registration: usize,
    pub notifications: NotificationCapacities,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let capacities = [
            ("queues.bus", self.bus),
            ("queues.registration", self.registration),
            ("queues.notifications.registered", self.notifications.registered),
            (
                "queues.notifications.became_available",
                self.notifications.became_available,
            ),
            ("queues.notifications.unregistered", self.notifications.unregistered),
            (
                "queues.notifications.incoming_message",
                self.notifications.incoming_message,
            ),
        ];
        match capacities.iter().find(|(_, capacity)| *capacity == 0) {
            Some((name, _)) => Err(ConfigError::Invalid(format!("{name} must be positive"))),
            None => Ok(()),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            bus: shared_bus::DEFAULT_CHANNEL_CAPACITY,
            registration: DEFAULT_REGISTRATION_QUEUE,
            notifications: NotificationCapacities::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("Channel {0} is outside 11..=26")]
    Channel(u8),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn env(var: &'static str, value: &str) -> Self {
        ConfigError::Env {
            var,
            value: value.to_string(),
        }
    }
}

fn check_policy(name: &str, policy: &RetryPolicy) -> Result<(), ConfigError> {
    if policy.timeout.is_zero() {
        return Err(ConfigError::Invalid(format!("{name} timeout must be positive")));
    }
    Ok(())
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env(var, value)),
    }
}

fn parse_pan_id(value: &str) -> Result<u16, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| ConfigError::env("STEWARD_PAN_ID", value))
}
