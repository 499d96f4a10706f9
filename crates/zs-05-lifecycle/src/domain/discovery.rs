//! Discovery state machine and device assembly.

use serde::{Deserialize, Serialize};
use shared_types::{
    Cluster, Device, DeviceAnnounce, Endpoint, NodeDescriptorResponse, SimpleDescriptorResponse,
};
use std::fmt;
use zs_04_requests::BasicAttributes;

/// Progress of a single device's discovery handshake.
///
/// ```text
/// Announced → AttributesRequested → NodeDescribed → EndpointsEnumerated
///           → EndpointDescribed(n)... → Registered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscoveryState {
    Announced,
    AttributesRequested,
    NodeDescribed,
    EndpointsEnumerated,
    EndpointDescribed(u8),
    Registered,
}

impl DiscoveryState {
    /// Metric label for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryState::Announced => "announced",
            DiscoveryState::AttributesRequested => "attributes_requested",
            DiscoveryState::NodeDescribed => "node_described",
            DiscoveryState::EndpointsEnumerated => "endpoints_enumerated",
            DiscoveryState::EndpointDescribed(_) => "endpoint_described",
            DiscoveryState::Registered => "registered",
        }
    }
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryState::EndpointDescribed(endpoint) => {
                write!(f, "endpoint_described({})", endpoint)
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// Result of processing one announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// Unknown device, discovered and persisted.
    Registered(Device),
    /// Known device, only its network address was refreshed.
    BecameAvailable(Device),
}

impl DiscoveryOutcome {
    pub fn device(&self) -> &Device {
        match self {
            DiscoveryOutcome::Registered(device) | DiscoveryOutcome::BecameAvailable(device) => {
                device
            }
        }
    }
}

/// Collects handshake answers until the device record can be built.
#[derive(Debug, Clone)]
pub struct DeviceDraft {
    announce: DeviceAnnounce,
    attributes: BasicAttributes,
    node: Option<NodeDescriptorResponse>,
    endpoints: Vec<Endpoint>,
    state: DiscoveryState,
}

impl DeviceDraft {
    pub fn new(announce: DeviceAnnounce) -> Self {
        Self {
            announce,
            attributes: BasicAttributes::default(),
            node: None,
            endpoints: Vec::new(),
            state: DiscoveryState::Announced,
        }
    }

    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    pub fn announce(&self) -> &DeviceAnnounce {
        &self.announce
    }

    /// Move to `state` before issuing the request that belongs to it.
    pub fn advance(&mut self, state: DiscoveryState) {
        self.state = state;
    }

    pub fn with_attributes(&mut self, attributes: BasicAttributes) {
        self.attributes = attributes;
    }

    pub fn with_node(&mut self, node: NodeDescriptorResponse) {
        self.node = Some(node);
    }

    /// Add a resolved endpoint. `resolve` names the cluster ids the codec
    /// recognises.
    pub fn add_endpoint(
        &mut self,
        descriptor: SimpleDescriptorResponse,
        resolve: impl Fn(u16) -> Option<String>,
    ) {
        let clusters = |ids: &[u16]| {
            ids.iter()
                .map(|&id| Cluster::resolve(id, resolve(id)))
                .collect::<Vec<_>>()
        };
        self.endpoints.push(Endpoint {
            id: descriptor.endpoint,
            profile_id: descriptor.profile_id,
            device_id: descriptor.device_id,
            device_version: descriptor.device_version,
            in_clusters: clusters(&descriptor.in_clusters),
            out_clusters: clusters(&descriptor.out_clusters),
        });
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Build the record. Missing node descriptor fields fall back to defaults.
    pub fn build(self) -> Device {
        let (logical_type, manufacturer_id) = match &self.node {
            Some(node) => (node.logical_type, node.manufacturer_code),
            None => (shared_types::LogicalType::EndDevice, 0),
        };
        Device {
            ieee_address: self.announce.ieee_address,
            network_address: self.announce.network_address,
            manufacturer: self.attributes.manufacturer.unwrap_or_default(),
            manufacturer_id,
            model: self.attributes.model.unwrap_or_default(),
            logical_type,
            main_powered: self.announce.capabilities.main_powered,
            power_source: self.attributes.power_source.unwrap_or_default(),
            endpoints: self.endpoints,
        }
    }
}
