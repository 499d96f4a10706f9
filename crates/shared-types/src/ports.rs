//! # Boundary Ports
//!
//! The two collaborators every subsystem depends on but none implements:
//!
//! - `CoordinatorTransport`: issues commands to the radio and yields its
//!   asynchronous events.
//! - `ClusterCodec`: converts application payloads to and from `ZclFrame`.
//!
//! Command methods resolve once the radio has acknowledged the command. The
//! acknowledgement is not the outcome: results arrive later as events on the
//! stream returned by `start`.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::entities::NetworkAddress;
use crate::errors::{CodecError, TransportError};
use crate::events::AdapterEvent;
use crate::ipc::{BindRequest, ConfigCommand, DataRequest, DeviceInfo, ResetType, ZclFrame};

/// Receiving halves handed out by `CoordinatorTransport::start`.
pub struct TransportStreams {
    pub events: mpsc::Receiver<AdapterEvent>,
    pub errors: mpsc::Receiver<TransportError>,
}

/// Link to the coordinator radio (Driven Port).
#[async_trait]
pub trait CoordinatorTransport: Send + Sync + 'static {
    /// Open the link. Called once; events and link errors flow through the
    /// returned streams until the transport shuts down.
    async fn start(&self) -> Result<TransportStreams, TransportError>;

    async fn reset(&self, reset_type: ResetType) -> Result<(), TransportError>;

    async fn configure(&self, command: ConfigCommand) -> Result<(), TransportError>;

    async fn device_info(&self) -> Result<DeviceInfo, TransportError>;

    async fn data_request(&self, request: DataRequest) -> Result<(), TransportError>;

    async fn node_descriptor_request(
        &self,
        destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
    ) -> Result<(), TransportError>;

    async fn active_endpoints_request(
        &self,
        destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
    ) -> Result<(), TransportError>;

    async fn simple_descriptor_request(
        &self,
        destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
        endpoint: u8,
    ) -> Result<(), TransportError>;

    async fn bind_request(&self, request: BindRequest) -> Result<(), TransportError>;

    async fn unbind_request(&self, request: BindRequest) -> Result<(), TransportError>;
}

/// Application frame codec (Driven Port).
pub trait ClusterCodec: Send + Sync + 'static {
    fn decode(&self, cluster_id: u16, payload: &[u8]) -> Result<ZclFrame, CodecError>;

    fn encode(&self, cluster_id: u16, frame: &ZclFrame) -> Result<Vec<u8>, CodecError>;

    /// Name of the cluster when the codec knows how to interpret it.
    fn cluster_name(&self, cluster_id: u16) -> Option<String>;
}
