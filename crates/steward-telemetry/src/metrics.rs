//! Prometheus metrics for the coordinator.
//!
//! All metrics follow the naming convention: `steward_<area>_<metric>_total`

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Events published on the bus, by kind
    pub static ref INBOUND_EVENTS: IntCounterVec = IntCounterVec::new(
        Opts::new("steward_inbound_events_total", "Inbound events published on the bus"),
        &["kind"]
    ).expect("metric creation failed");

    /// Application payloads the codec could not decode
    pub static ref DECODE_FAILURES: IntCounter = IntCounter::new(
        "steward_inbound_decode_failures_total",
        "Incoming application messages dropped because they failed to decode"
    ).expect("metric creation failed");

    /// Errors reported on the transport's error stream
    pub static ref TRANSPORT_ERRORS: IntCounter = IntCounter::new(
        "steward_transport_errors_total",
        "Errors reported by the coordinator transport"
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Devices that completed discovery
    pub static ref DEVICES_REGISTERED: IntCounter = IntCounter::new(
        "steward_devices_registered_total",
        "Devices registered after a completed discovery"
    ).expect("metric creation failed");

    /// Devices removed after a leave indication
    pub static ref DEVICES_UNREGISTERED: IntCounter = IntCounter::new(
        "steward_devices_unregistered_total",
        "Devices removed after leaving the network"
    ).expect("metric creation failed");

    /// Discoveries abandoned, by the step that failed
    pub static ref DISCOVERY_ABANDONED: IntCounterVec = IntCounterVec::new(
        Opts::new("steward_discovery_abandoned_total", "Discoveries abandoned before registration"),
        &["state"]
    ).expect("metric creation failed");

    /// Notifications dropped because the consumer queue was full
    pub static ref NOTIFICATIONS_DROPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("steward_notifications_dropped_total", "Notifications dropped on a full queue"),
        &["queue"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Inbound
        Box::new(INBOUND_EVENTS.clone()),
        Box::new(DECODE_FAILURES.clone()),
        Box::new(TRANSPORT_ERRORS.clone()),
        // Lifecycle
        Box::new(DEVICES_REGISTERED.clone()),
        Box::new(DEVICES_UNREGISTERED.clone()),
        Box::new(DISCOVERY_ABANDONED.clone()),
        Box::new(NOTIFICATIONS_DROPPED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
