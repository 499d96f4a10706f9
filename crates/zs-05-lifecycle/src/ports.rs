//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{NetworkAddress, NodeDescriptorResponse, SimpleDescriptorResponse};
use zs_04_requests::{BasicAttributes, RequestError};

/// The requests discovery issues to a newly joined device.
///
/// Each call already carries its own timeout and retry budget; a returned
/// error is final for that step.
#[async_trait]
pub trait DeviceInterrogator: Send + Sync + 'static {
    async fn basic_attributes(
        &self,
        network_address: NetworkAddress,
    ) -> Result<BasicAttributes, RequestError>;

    async fn node_descriptor(
        &self,
        network_address: NetworkAddress,
    ) -> Result<NodeDescriptorResponse, RequestError>;

    async fn active_endpoints(&self, network_address: NetworkAddress)
        -> Result<Vec<u8>, RequestError>;

    async fn simple_descriptor(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<SimpleDescriptorResponse, RequestError>;

    /// Human-readable name of a cluster id the codec recognises.
    fn cluster_name(&self, cluster_id: u16) -> Option<String>;
}
