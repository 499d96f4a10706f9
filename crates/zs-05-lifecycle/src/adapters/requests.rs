//! `DeviceInterrogator` backed by the coordinator request operations.

use async_trait::async_trait;
use shared_types::{
    ClusterCodec, CoordinatorTransport, NetworkAddress, NodeDescriptorResponse,
    SimpleDescriptorResponse,
};
use zs_04_requests::{BasicAttributes, CoordinatorRequests, RequestError};

use crate::ports::DeviceInterrogator;

#[async_trait]
impl<T, C> DeviceInterrogator for CoordinatorRequests<T, C>
where
    T: CoordinatorTransport,
    C: ClusterCodec,
{
    async fn basic_attributes(
        &self,
        network_address: NetworkAddress,
    ) -> Result<BasicAttributes, RequestError> {
        self.read_basic_attributes(network_address).await
    }

    async fn node_descriptor(
        &self,
        network_address: NetworkAddress,
    ) -> Result<NodeDescriptorResponse, RequestError> {
        CoordinatorRequests::node_descriptor(self, network_address).await
    }

    async fn active_endpoints(
        &self,
        network_address: NetworkAddress,
    ) -> Result<Vec<u8>, RequestError> {
        let response = CoordinatorRequests::active_endpoints(self, network_address).await?;
        Ok(response.endpoints)
    }

    async fn simple_descriptor(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<SimpleDescriptorResponse, RequestError> {
        CoordinatorRequests::simple_descriptor(self, network_address, endpoint).await
    }

    fn cluster_name(&self, cluster_id: u16) -> Option<String> {
        self.codec().cluster_name(cluster_id)
    }
}
