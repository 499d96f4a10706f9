//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or a full `EnvFilter` spec)
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to format logs as JSON lines
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "steward".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STEWARD_SERVICE_NAME`: Service name (default: steward)
    /// - `STEWARD_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `STEWARD_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `STEWARD_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("STEWARD_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("STEWARD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("STEWARD_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: lookup("STEWARD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),
        }
    }
}
