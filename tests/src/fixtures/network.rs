//! # Simulated Network
//!
//! `ScriptedRadio` plays both the coordinator radio and the devices behind
//! it. Every command is acknowledged synchronously; replies are pushed onto
//! the transport event stream, exactly like a real link would deliver them.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::clusters::{self, basic, global};
use shared_types::{
    ActiveEndpointsResponse, AdapterEvent, AfIncomingMessage, AttributeReport, AttributeValue,
    BindRequest, BindResponse, ClusterCodec, ConfigCommand, CoordinatorTransport, DataConfirm,
    DataRequest, DeviceAnnounce, DeviceCapabilities, DeviceInfo, DeviceLeave, IeeeAddress,
    LogicalType, NetworkAddress, NodeDescriptorResponse, ReadAttributeStatus, ResetIndication,
    ResetType, SimpleDescriptorResponse, Status, TransportError, TransportStreams,
    UnbindResponse, WriteAttributeStatus, ZclCommand, ZclFrame, ZclStatus,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::codec::JsonCodec;

/// Coordinator identity reported by `device_info`.
pub const COORDINATOR_IEEE: IeeeAddress = IeeeAddress(0x0012_4b00_019c_2ee9);

// =============================================================================
// DEVICES
// =============================================================================

#[derive(Debug, Clone)]
pub struct SimEndpoint {
    pub id: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub device_version: u8,
    pub in_clusters: Vec<u16>,
    pub out_clusters: Vec<u16>,
}

impl SimEndpoint {
    pub fn home_automation(id: u8, device_id: u16, in_clusters: Vec<u16>) -> Self {
        Self {
            id,
            profile_id: 0x0104,
            device_id,
            device_version: 1,
            in_clusters,
            out_clusters: Vec::new(),
        }
    }
}

/// A device as it answers over the air.
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub ieee_address: IeeeAddress,
    pub network_address: NetworkAddress,
    pub manufacturer: String,
    pub model: String,
    /// Raw Basic cluster power source value.
    pub power_source: u8,
    pub logical_type: LogicalType,
    pub manufacturer_code: u16,
    pub main_powered: bool,
    pub endpoints: Vec<SimEndpoint>,
    /// Endpoints whose simple descriptor request fails.
    pub failing_endpoints: Vec<u8>,
    /// Ignore the node descriptor request entirely.
    pub silent_node_descriptor: bool,
}

impl SimDevice {
    /// Battery powered end device with a single Home Automation endpoint.
    pub fn acme_widget() -> Self {
        Self {
            ieee_address: IeeeAddress(0x0011_2233_4455_6677),
            network_address: NetworkAddress(0x1234),
            manufacturer: "Acme".into(),
            model: "Widget".into(),
            power_source: 3,
            logical_type: LogicalType::EndDevice,
            manufacturer_code: 0x1037,
            main_powered: false,
            endpoints: vec![SimEndpoint::home_automation(
                1,
                0x0100,
                vec![clusters::BASIC, clusters::POWER_CONFIGURATION, clusters::IDENTIFY],
            )],
            failing_endpoints: Vec::new(),
            silent_node_descriptor: false,
        }
    }

    /// Mains powered router with three light endpoints.
    pub fn triple_switch() -> Self {
        Self {
            ieee_address: IeeeAddress(0x00a4_c138_0f1e_22d3),
            network_address: NetworkAddress(0x5a17),
            manufacturer: "Volta".into(),
            model: "TS0003".into(),
            power_source: 1,
            logical_type: LogicalType::Router,
            manufacturer_code: 0x1002,
            main_powered: true,
            endpoints: (1..=3)
                .map(|id| {
                    SimEndpoint::home_automation(
                        id,
                        0x0100,
                        vec![clusters::BASIC, clusters::ON_OFF],
                    )
                })
                .collect(),
            failing_endpoints: Vec::new(),
            silent_node_descriptor: false,
        }
    }

    pub fn announce(&self) -> AdapterEvent {
        AdapterEvent::DeviceAnnounce(DeviceAnnounce {
            src_address: self.network_address,
            network_address: self.network_address,
            ieee_address: self.ieee_address,
            capabilities: DeviceCapabilities {
                main_powered: self.main_powered,
                receiver_on_when_idle: self.main_powered,
                ..DeviceCapabilities::default()
            },
        })
    }

    pub fn leave(&self) -> AdapterEvent {
        AdapterEvent::DeviceLeave(DeviceLeave {
            src_address: self.network_address,
            ieee_address: self.ieee_address,
            request: false,
            remove_children: false,
            rejoin: false,
        })
    }

    /// Unsolicited On/Off attribute report.
    pub fn on_off_report(&self, on: bool) -> AdapterEvent {
        let frame = ZclFrame::global(
            global::REPORT_ATTRIBUTES,
            ZclCommand::ReportAttributes(vec![AttributeReport {
                attribute_id: 0x0000,
                value: AttributeValue::Bool(on),
            }]),
        );
        self.message(clusters::ON_OFF, 1, 1, 0, encode(clusters::ON_OFF, &frame))
    }

    fn message(
        &self,
        cluster_id: u16,
        src_endpoint: u8,
        dst_endpoint: u8,
        transaction_sequence: u8,
        payload: Vec<u8>,
    ) -> AdapterEvent {
        AdapterEvent::IncomingMessage(AfIncomingMessage {
            group_id: 0,
            cluster_id,
            src_address: self.network_address,
            src_endpoint,
            dst_endpoint,
            was_broadcast: false,
            link_quality: 110,
            security_use: false,
            timestamp: 0,
            transaction_sequence,
            payload,
        })
    }

    fn answer(&self, frame: &ZclFrame) -> Option<ZclFrame> {
        let reply = match &frame.command {
            ZclCommand::ReadAttributes(ids) => ZclFrame::global(
                global::READ_ATTRIBUTES_RESPONSE,
                ZclCommand::ReadAttributesResponse(
                    ids.iter().map(|&id| self.read_attribute(id)).collect(),
                ),
            ),
            ZclCommand::WriteAttributes(records) => ZclFrame::global(
                global::WRITE_ATTRIBUTES_RESPONSE,
                ZclCommand::WriteAttributesResponse(
                    records
                        .iter()
                        .map(|r| WriteAttributeStatus {
                            status: ZclStatus::Success,
                            attribute_id: r.attribute_id,
                        })
                        .collect(),
                ),
            ),
            ZclCommand::OnOff(_) | ZclCommand::LevelControl(_) => ZclFrame::global(
                global::DEFAULT_RESPONSE,
                ZclCommand::DefaultResponse {
                    command_id: frame.command_id,
                    status: ZclStatus::Success,
                },
            ),
            _ => return None,
        };
        Some(reply.with_transaction_sequence(frame.transaction_sequence_number))
    }

    fn read_attribute(&self, attribute_id: u16) -> ReadAttributeStatus {
        let value = match attribute_id {
            basic::MANUFACTURER_NAME => Some(AttributeValue::String(self.manufacturer.clone())),
            basic::MODEL_IDENTIFIER => Some(AttributeValue::String(self.model.clone())),
            basic::POWER_SOURCE => Some(AttributeValue::Unsigned(u64::from(self.power_source))),
            _ => None,
        };
        ReadAttributeStatus {
            attribute_id,
            status: if value.is_some() {
                ZclStatus::Success
            } else {
                ZclStatus::UnsupportedAttribute
            },
            value,
        }
    }
}

fn encode(cluster_id: u16, frame: &ZclFrame) -> Vec<u8> {
    JsonCodec.encode(cluster_id, frame).unwrap_or_default()
}

// =============================================================================
// RADIO
// =============================================================================

/// How data requests are confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmScript {
    /// Confirm with the request's transaction id.
    #[default]
    Matching,
    /// Confirm someone else's transaction (id + 1) first, then ours.
    StrayFirst,
    /// Only ever confirm id + 1.
    StrayOnly,
}

pub struct ScriptedRadio {
    devices: Mutex<HashMap<NetworkAddress, SimDevice>>,
    events: Mutex<Option<mpsc::Sender<AdapterEvent>>>,
    errors: Mutex<Option<mpsc::Sender<TransportError>>>,
    configured: Mutex<Vec<ConfigCommand>>,
    data_requests: Mutex<Vec<DataRequest>>,
    confirm_script: Mutex<ConfirmScript>,
    resets: AtomicU32,
}

impl ScriptedRadio {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            devices: Mutex::new(HashMap::new()),
            events: Mutex::new(None),
            errors: Mutex::new(None),
            configured: Mutex::new(Vec::new()),
            data_requests: Mutex::new(Vec::new()),
            confirm_script: Mutex::new(ConfirmScript::default()),
            resets: AtomicU32::new(0),
        })
    }

    /// Make `device` reachable. It does not announce by itself.
    pub fn add_device(&self, device: SimDevice) {
        self.devices.lock().insert(device.network_address, device);
    }

    pub fn set_confirm_script(&self, script: ConfirmScript) {
        *self.confirm_script.lock() = script;
    }

    /// Deliver an event as if the radio had received it.
    pub async fn inject(&self, event: AdapterEvent) {
        let sender = self.events.lock().clone();
        if let Some(sender) = sender {
            let _ = sender.send(event).await;
        }
    }

    /// Report a link error.
    pub async fn fail_link(&self, error: TransportError) {
        let sender = self.errors.lock().clone();
        if let Some(sender) = sender {
            let _ = sender.send(error).await;
        }
    }

    /// Move `device` to a new network address and announce it.
    pub async fn rejoin(&self, ieee_address: IeeeAddress, network_address: NetworkAddress) {
        let moved = {
            let mut devices = self.devices.lock();
            let old = devices
                .iter()
                .find(|(_, d)| d.ieee_address == ieee_address)
                .map(|(nwk, _)| *nwk);
            match old.and_then(|nwk| devices.remove(&nwk)) {
                Some(mut device) => {
                    device.network_address = network_address;
                    devices.insert(network_address, device.clone());
                    Some(device)
                }
                None => None,
            }
        };
        if let Some(device) = moved {
            self.inject(device.announce()).await;
        }
    }

    pub fn configured(&self) -> Vec<ConfigCommand> {
        self.configured.lock().clone()
    }

    pub fn data_requests(&self) -> Vec<DataRequest> {
        self.data_requests.lock().clone()
    }

    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::SeqCst)
    }

    fn device(&self, network_address: NetworkAddress) -> Option<SimDevice> {
        self.devices.lock().get(&network_address).cloned()
    }

    fn unreachable(operation: &str) -> TransportError {
        TransportError::Rejected {
            operation: operation.to_string(),
            status: Status::MacNoAck,
        }
    }
}

#[async_trait]
impl CoordinatorTransport for ScriptedRadio {
    async fn start(&self) -> Result<TransportStreams, TransportError> {
        let (event_tx, events) = mpsc::channel(256);
        let (error_tx, errors) = mpsc::channel(16);
        *self.events.lock() = Some(event_tx);
        *self.errors.lock() = Some(error_tx);
        Ok(TransportStreams { events, errors })
    }

    async fn reset(&self, _reset_type: ResetType) -> Result<(), TransportError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.inject(AdapterEvent::ResetIndication(ResetIndication {
            reason: 0,
            transport_revision: 2,
            product_id: 1,
            major_release: 2,
            minor_release: 7,
            hardware_revision: 1,
        }))
        .await;
        Ok(())
    }

    async fn configure(&self, command: ConfigCommand) -> Result<(), TransportError> {
        self.configured.lock().push(command);
        Ok(())
    }

    async fn device_info(&self) -> Result<DeviceInfo, TransportError> {
        Ok(DeviceInfo {
            ieee_address: COORDINATOR_IEEE,
            network_address: NetworkAddress::COORDINATOR,
            device_state: 9,
        })
    }

    async fn data_request(&self, request: DataRequest) -> Result<(), TransportError> {
        self.data_requests.lock().push(request.clone());
        let device = self
            .device(request.dst_address)
            .ok_or_else(|| Self::unreachable("data_request"))?;

        let confirm = |transaction_id| {
            AdapterEvent::DataConfirm(DataConfirm {
                endpoint: request.src_endpoint,
                transaction_id,
                status: Status::Success,
            })
        };
        let stray = request.transaction_id.wrapping_add(1);
        let script = *self.confirm_script.lock();
        match script {
            ConfirmScript::Matching => self.inject(confirm(request.transaction_id)).await,
            ConfirmScript::StrayFirst => {
                self.inject(confirm(stray)).await;
                self.inject(confirm(request.transaction_id)).await;
            }
            ConfirmScript::StrayOnly => {
                self.inject(confirm(stray)).await;
                return Ok(());
            }
        }

        let Ok(frame) = JsonCodec.decode(request.cluster_id, &request.payload) else {
            return Ok(());
        };
        if let Some(reply) = device.answer(&frame) {
            let src_endpoint = match request.dst_endpoint {
                0xFF => device.endpoints.first().map_or(1, |e| e.id),
                endpoint => endpoint,
            };
            self.inject(device.message(
                request.cluster_id,
                src_endpoint,
                request.src_endpoint,
                request.transaction_id,
                encode(request.cluster_id, &reply),
            ))
            .await;
        }
        Ok(())
    }

    async fn node_descriptor_request(
        &self,
        _destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
    ) -> Result<(), TransportError> {
        let device = self
            .device(network_address_of_interest)
            .ok_or_else(|| Self::unreachable("node_descriptor"))?;
        if device.silent_node_descriptor {
            return Ok(());
        }
        self.inject(AdapterEvent::NodeDescriptor(NodeDescriptorResponse {
            src_address: device.network_address,
            status: Status::Success,
            network_address: device.network_address,
            logical_type: device.logical_type,
            manufacturer_code: device.manufacturer_code,
        }))
        .await;
        Ok(())
    }

    async fn active_endpoints_request(
        &self,
        _destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
    ) -> Result<(), TransportError> {
        let device = self
            .device(network_address_of_interest)
            .ok_or_else(|| Self::unreachable("active_endpoints"))?;
        self.inject(AdapterEvent::ActiveEndpoints(ActiveEndpointsResponse {
            src_address: device.network_address,
            status: Status::Success,
            network_address: device.network_address,
            endpoints: device.endpoints.iter().map(|e| e.id).collect(),
        }))
        .await;
        Ok(())
    }

    async fn simple_descriptor_request(
        &self,
        _destination: NetworkAddress,
        network_address_of_interest: NetworkAddress,
        endpoint: u8,
    ) -> Result<(), TransportError> {
        let device = self
            .device(network_address_of_interest)
            .ok_or_else(|| Self::unreachable("simple_descriptor"))?;
        let descriptor = device.endpoints.iter().find(|e| e.id == endpoint);
        let response = match descriptor {
            Some(e) if !device.failing_endpoints.contains(&endpoint) => SimpleDescriptorResponse {
                src_address: device.network_address,
                status: Status::Success,
                network_address: device.network_address,
                endpoint,
                profile_id: e.profile_id,
                device_id: e.device_id,
                device_version: e.device_version,
                in_clusters: e.in_clusters.clone(),
                out_clusters: e.out_clusters.clone(),
            },
            _ => SimpleDescriptorResponse {
                src_address: device.network_address,
                status: Status::InvalidParameter,
                network_address: device.network_address,
                endpoint,
                profile_id: 0,
                device_id: 0,
                device_version: 0,
                in_clusters: Vec::new(),
                out_clusters: Vec::new(),
            },
        };
        self.inject(AdapterEvent::SimpleDescriptor(response)).await;
        Ok(())
    }

    async fn bind_request(&self, request: BindRequest) -> Result<(), TransportError> {
        let device = self
            .device(request.destination)
            .ok_or_else(|| Self::unreachable("bind"))?;
        self.inject(AdapterEvent::BindResponse(BindResponse {
            src_address: device.network_address,
            status: Status::Success,
        }))
        .await;
        Ok(())
    }

    async fn unbind_request(&self, request: BindRequest) -> Result<(), TransportError> {
        let device = self
            .device(request.destination)
            .ok_or_else(|| Self::unreachable("unbind"))?;
        self.inject(AdapterEvent::UnbindResponse(UnbindResponse {
            src_address: device.network_address,
            status: Status::Success,
        }))
        .await;
        Ok(())
    }
}
