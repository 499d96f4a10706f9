//! # Inbound Events
//!
//! Everything the coordinator radio reports asynchronously.
//!
//! `AdapterEvent` is what a transport emits; the runtime decodes application
//! payloads and publishes `InboundEvent` on the broadcast dispatcher.
//! Listeners select events by `EventKind`.

use serde::{Deserialize, Serialize};

use crate::entities::NetworkAddress;
use crate::ipc::{
    ActiveEndpointsResponse, AfIncomingMessage, BindResponse, DataConfirm, DeviceAnnounce,
    DeviceLeave, NodeDescriptorResponse, ResetIndication, SimpleDescriptorResponse,
    TrustCenterJoin, UnbindResponse, ZclIncomingMessage,
};

/// Discriminant of an inbound event, used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    DataConfirm,
    DeviceAnnounce,
    DeviceLeave,
    TrustCenterJoin,
    IncomingMessage,
    NodeDescriptor,
    ActiveEndpoints,
    SimpleDescriptor,
    BindResponse,
    UnbindResponse,
    ResetIndication,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DataConfirm => "data_confirm",
            EventKind::DeviceAnnounce => "device_announce",
            EventKind::DeviceLeave => "device_leave",
            EventKind::TrustCenterJoin => "trust_center_join",
            EventKind::IncomingMessage => "incoming_message",
            EventKind::NodeDescriptor => "node_descriptor",
            EventKind::ActiveEndpoints => "active_endpoints",
            EventKind::SimpleDescriptor => "simple_descriptor",
            EventKind::BindResponse => "bind_response",
            EventKind::UnbindResponse => "unbind_response",
            EventKind::ResetIndication => "reset_indication",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw event as emitted by a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdapterEvent {
    DataConfirm(DataConfirm),
    DeviceAnnounce(DeviceAnnounce),
    DeviceLeave(DeviceLeave),
    TrustCenterJoin(TrustCenterJoin),
    IncomingMessage(AfIncomingMessage),
    NodeDescriptor(NodeDescriptorResponse),
    ActiveEndpoints(ActiveEndpointsResponse),
    SimpleDescriptor(SimpleDescriptorResponse),
    BindResponse(BindResponse),
    UnbindResponse(UnbindResponse),
    ResetIndication(ResetIndication),
}

impl AdapterEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AdapterEvent::DataConfirm(_) => EventKind::DataConfirm,
            AdapterEvent::DeviceAnnounce(_) => EventKind::DeviceAnnounce,
            AdapterEvent::DeviceLeave(_) => EventKind::DeviceLeave,
            AdapterEvent::TrustCenterJoin(_) => EventKind::TrustCenterJoin,
            AdapterEvent::IncomingMessage(_) => EventKind::IncomingMessage,
            AdapterEvent::NodeDescriptor(_) => EventKind::NodeDescriptor,
            AdapterEvent::ActiveEndpoints(_) => EventKind::ActiveEndpoints,
            AdapterEvent::SimpleDescriptor(_) => EventKind::SimpleDescriptor,
            AdapterEvent::BindResponse(_) => EventKind::BindResponse,
            AdapterEvent::UnbindResponse(_) => EventKind::UnbindResponse,
            AdapterEvent::ResetIndication(_) => EventKind::ResetIndication,
        }
    }
}

/// Event as published on the dispatcher, application payload decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundEvent {
    DataConfirm(DataConfirm),
    DeviceAnnounce(DeviceAnnounce),
    DeviceLeave(DeviceLeave),
    TrustCenterJoin(TrustCenterJoin),
    IncomingMessage(ZclIncomingMessage),
    NodeDescriptor(NodeDescriptorResponse),
    ActiveEndpoints(ActiveEndpointsResponse),
    SimpleDescriptor(SimpleDescriptorResponse),
    BindResponse(BindResponse),
    UnbindResponse(UnbindResponse),
    ResetIndication(ResetIndication),
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::DataConfirm(_) => EventKind::DataConfirm,
            InboundEvent::DeviceAnnounce(_) => EventKind::DeviceAnnounce,
            InboundEvent::DeviceLeave(_) => EventKind::DeviceLeave,
            InboundEvent::TrustCenterJoin(_) => EventKind::TrustCenterJoin,
            InboundEvent::IncomingMessage(_) => EventKind::IncomingMessage,
            InboundEvent::NodeDescriptor(_) => EventKind::NodeDescriptor,
            InboundEvent::ActiveEndpoints(_) => EventKind::ActiveEndpoints,
            InboundEvent::SimpleDescriptor(_) => EventKind::SimpleDescriptor,
            InboundEvent::BindResponse(_) => EventKind::BindResponse,
            InboundEvent::UnbindResponse(_) => EventKind::UnbindResponse,
            InboundEvent::ResetIndication(_) => EventKind::ResetIndication,
        }
    }

    /// Network address of the node this event originated from, when known.
    pub fn source(&self) -> Option<NetworkAddress> {
        match self {
            InboundEvent::DeviceAnnounce(e) => Some(e.network_address),
            InboundEvent::DeviceLeave(e) => Some(e.src_address),
            InboundEvent::TrustCenterJoin(e) => Some(e.network_address),
            InboundEvent::IncomingMessage(e) => Some(e.src_address),
            InboundEvent::NodeDescriptor(e) => Some(e.src_address),
            InboundEvent::ActiveEndpoints(e) => Some(e.src_address),
            InboundEvent::SimpleDescriptor(e) => Some(e.src_address),
            InboundEvent::BindResponse(e) => Some(e.src_address),
            InboundEvent::UnbindResponse(e) => Some(e.src_address),
            InboundEvent::DataConfirm(_) | InboundEvent::ResetIndication(_) => None,
        }
    }
}
