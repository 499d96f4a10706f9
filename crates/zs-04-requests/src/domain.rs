//! Request policy and typed results.

use serde::{Deserialize, Serialize};
use shared_types::clusters::basic;
use shared_types::{AttributeValue, PowerSource, ReadAttributeStatus, ZclStatus};
use zs_01_correlation::RetryPolicy;

/// Maximum hop count of outbound application frames.
pub const DEFAULT_RADIUS: u8 = 15;

/// Coordinator endpoint application frames are sent from.
pub const COORDINATOR_ENDPOINT: u8 = 1;

/// Destination endpoint that addresses every endpoint of a device.
pub const BROADCAST_ENDPOINT: u8 = 0xFF;

/// Timeouts and retry budgets of all request operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestPolicy {
    /// ZDO requests, bind/unbind, attribute reads/writes and cluster commands.
    pub default: RetryPolicy,
    /// Radio reset.
    pub reset: RetryPolicy,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            default: RetryPolicy::DEFAULT,
            reset: RetryPolicy::RESET,
        }
    }
}

/// Identity attributes of the Basic cluster.
///
/// Fields are `None` when the device reported the attribute as unsupported
/// or returned a value of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAttributes {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub power_source: Option<PowerSource>,
}

impl BasicAttributes {
    pub const IDS: [u16; 3] = [
        basic::MANUFACTURER_NAME,
        basic::MODEL_IDENTIFIER,
        basic::POWER_SOURCE,
    ];

    pub fn from_records(records: &[ReadAttributeStatus]) -> Self {
        let mut attributes = BasicAttributes::default();
        for record in records {
            if record.status != ZclStatus::Success {
                continue;
            }
            let Some(value) = &record.value else {
                continue;
            };
            match record.attribute_id {
                basic::MANUFACTURER_NAME => {
                    attributes.manufacturer = value.as_str().map(str::to_string)
                }
                basic::MODEL_IDENTIFIER => attributes.model = value.as_str().map(str::to_string),
                basic::POWER_SOURCE => {
                    attributes.power_source = match value {
                        AttributeValue::Unsigned(raw) => Some(PowerSource::from(*raw)),
                        _ => None,
                    }
                }
                _ => {}
            }
        }
        attributes
    }
}
