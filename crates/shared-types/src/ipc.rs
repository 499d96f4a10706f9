//! # Radio Message Payloads
//!
//! Payload types exchanged with the coordinator radio.
//!
//! ## Inbound
//!
//! - ZDO indications: `DeviceAnnounce`, `DeviceLeave`, `TrustCenterJoin`
//! - ZDO responses: `NodeDescriptorResponse`, `ActiveEndpointsResponse`,
//!   `SimpleDescriptorResponse`, `BindResponse`, `UnbindResponse`
//! - AF: `DataConfirm`, `AfIncomingMessage` (raw) / `ZclIncomingMessage` (decoded)
//! - SYS: `ResetIndication`
//!
//! ## Outbound
//!
//! - `DataRequest`, `BindRequest`, `ResetType`, `ConfigCommand`

use serde::{Deserialize, Serialize};

use crate::entities::{IeeeAddress, LogicalType, NetworkAddress};

// =============================================================================
// STATUS CODES
// =============================================================================

/// Status byte returned by the radio, both for synchronous command
/// acknowledgements and inside asynchronous confirmations/responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    Failure,
    InvalidParameter,
    MemoryError,
    BufferFull,
    NoRoute,
    MacNoAck,
    MacTransactionExpired,
    Other(u8),
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Status::Success,
            0x01 => Status::Failure,
            0x02 => Status::InvalidParameter,
            0x10 => Status::MemoryError,
            0x11 => Status::BufferFull,
            0xCD => Status::NoRoute,
            0xE9 => Status::MacNoAck,
            0xF0 => Status::MacTransactionExpired,
            other => Status::Other(other),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Other(code) => write!(f, "Other(0x{:02x})", code),
            named => write!(f, "{:?}", named),
        }
    }
}

/// Status code carried inside application (ZCL) frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZclStatus {
    Success,
    Failure,
    UnsupportedClusterCommand,
    UnsupportedAttribute,
    InvalidValue,
    ReadOnly,
    Other(u8),
}

impl From<u8> for ZclStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => ZclStatus::Success,
            0x01 => ZclStatus::Failure,
            0x81 => ZclStatus::UnsupportedClusterCommand,
            0x86 => ZclStatus::UnsupportedAttribute,
            0x87 => ZclStatus::InvalidValue,
            0x88 => ZclStatus::ReadOnly,
            other => ZclStatus::Other(other),
        }
    }
}

// =============================================================================
// ZDO INDICATIONS
// =============================================================================

/// Capability flags from a device announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    pub alternate_pan_coordinator: bool,
    pub full_function_device: bool,
    pub main_powered: bool,
    pub receiver_on_when_idle: bool,
    pub security_capable: bool,
}

/// A device joined or rejoined the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAnnounce {
    pub src_address: NetworkAddress,
    pub network_address: NetworkAddress,
    pub ieee_address: IeeeAddress,
    pub capabilities: DeviceCapabilities,
}

/// A device left the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLeave {
    pub src_address: NetworkAddress,
    pub ieee_address: IeeeAddress,
    pub request: bool,
    pub remove_children: bool,
    pub rejoin: bool,
}

/// The trust center admitted a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustCenterJoin {
    pub network_address: NetworkAddress,
    pub ieee_address: IeeeAddress,
    pub parent_address: NetworkAddress,
}

// =============================================================================
// ZDO RESPONSES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptorResponse {
    pub src_address: NetworkAddress,
    pub status: Status,
    pub network_address: NetworkAddress,
    pub logical_type: LogicalType,
    pub manufacturer_code: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEndpointsResponse {
    pub src_address: NetworkAddress,
    pub status: Status,
    pub network_address: NetworkAddress,
    pub endpoints: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDescriptorResponse {
    pub src_address: NetworkAddress,
    pub status: Status,
    pub network_address: NetworkAddress,
    pub endpoint: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub device_version: u8,
    pub in_clusters: Vec<u16>,
    pub out_clusters: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindResponse {
    pub src_address: NetworkAddress,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbindResponse {
    pub src_address: NetworkAddress,
    pub status: Status,
}

// =============================================================================
// SYS
// =============================================================================

/// Emitted by the radio after it finished (re)booting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetIndication {
    pub reason: u8,
    pub transport_revision: u8,
    pub product_id: u8,
    pub major_release: u8,
    pub minor_release: u8,
    pub hardware_revision: u8,
}

/// Identity of the coordinator radio itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub ieee_address: IeeeAddress,
    pub network_address: NetworkAddress,
    pub device_state: u8,
}

// =============================================================================
// AF (APPLICATION FRAMEWORK)
// =============================================================================

/// Delivery confirmation for a `DataRequest`, keyed by transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfirm {
    pub endpoint: u8,
    pub transaction_id: u8,
    pub status: Status,
}

/// An application message as delivered by the radio, payload still encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfIncomingMessage {
    pub group_id: u16,
    pub cluster_id: u16,
    pub src_address: NetworkAddress,
    pub src_endpoint: u8,
    pub dst_endpoint: u8,
    pub was_broadcast: bool,
    pub link_quality: u8,
    pub security_use: bool,
    pub timestamp: u32,
    pub transaction_sequence: u8,
    pub payload: Vec<u8>,
}

/// Frame type bits of a ZCL frame control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    /// Profile-wide command (read/write attributes, default response ...).
    Global,
    /// Cluster-specific command.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    String(String),
    Bytes(Vec<u8>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttributeValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadAttributeStatus {
    pub attribute_id: u16,
    pub status: ZclStatus,
    pub value: Option<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteAttributeRecord {
    pub attribute_id: u16,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteAttributeStatus {
    pub status: ZclStatus,
    pub attribute_id: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    pub attribute_id: u16,
    pub value: AttributeValue,
}

/// On/Off cluster (`0x0006`) commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnOffCommand {
    Off,
    On,
    Toggle,
    OffWithEffect { effect_id: u8, effect_variant: u8 },
    OnWithRecallGlobalScene,
    OnWithTimedOff { on_off_control: u8, on_time: u16, off_wait_time: u16 },
}

impl OnOffCommand {
    pub fn command_id(&self) -> u8 {
        match self {
            OnOffCommand::Off => 0x00,
            OnOffCommand::On => 0x01,
            OnOffCommand::Toggle => 0x02,
            OnOffCommand::OffWithEffect { .. } => 0x40,
            OnOffCommand::OnWithRecallGlobalScene => 0x41,
            OnOffCommand::OnWithTimedOff { .. } => 0x42,
        }
    }
}

/// Level Control cluster (`0x0008`) commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelControlCommand {
    MoveToLevel { level: u8, transition_time: u16 },
    Move { move_mode: u8, rate: u8 },
    Step { step_mode: u8, step_size: u8, transition_time: u16 },
    Stop,
    MoveToLevelOnOff { level: u8, transition_time: u16 },
    MoveOnOff { move_mode: u8, rate: u8 },
    StepOnOff { step_mode: u8, step_size: u8, transition_time: u16 },
    StopOnOff,
}

impl LevelControlCommand {
    pub fn command_id(&self) -> u8 {
        match self {
            LevelControlCommand::MoveToLevel { .. } => 0x00,
            LevelControlCommand::Move { .. } => 0x01,
            LevelControlCommand::Step { .. } => 0x02,
            LevelControlCommand::Stop => 0x03,
            LevelControlCommand::MoveToLevelOnOff { .. } => 0x04,
            LevelControlCommand::MoveOnOff { .. } => 0x05,
            LevelControlCommand::StepOnOff { .. } => 0x06,
            LevelControlCommand::StopOnOff => 0x07,
        }
    }
}

/// Decoded ZCL command payload.
///
/// The byte layout of each variant is owned by the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZclCommand {
    ReadAttributes(Vec<u16>),
    ReadAttributesResponse(Vec<ReadAttributeStatus>),
    WriteAttributes(Vec<WriteAttributeRecord>),
    WriteAttributesResponse(Vec<WriteAttributeStatus>),
    ReportAttributes(Vec<AttributeReport>),
    DefaultResponse { command_id: u8, status: ZclStatus },
    OnOff(OnOffCommand),
    LevelControl(LevelControlCommand),
    /// A command the codec does not model; payload kept verbatim.
    Unknown(Vec<u8>),
}

/// A ZCL frame: header fields plus the decoded command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZclFrame {
    pub frame_type: FrameType,
    pub direction: Direction,
    pub manufacturer_code: Option<u16>,
    pub disable_default_response: bool,
    pub transaction_sequence_number: u8,
    pub command_id: u8,
    pub command: ZclCommand,
}

impl ZclFrame {
    /// A client-to-server profile-wide command frame.
    pub fn global(command_id: u8, command: ZclCommand) -> Self {
        Self {
            frame_type: FrameType::Global,
            direction: Direction::ClientToServer,
            manufacturer_code: None,
            disable_default_response: true,
            transaction_sequence_number: 0,
            command_id,
            command,
        }
    }

    /// A client-to-server cluster-specific command frame that asks for a
    /// default response.
    pub fn local(command_id: u8, command: ZclCommand) -> Self {
        Self {
            frame_type: FrameType::Local,
            direction: Direction::ClientToServer,
            manufacturer_code: None,
            disable_default_response: false,
            transaction_sequence_number: 0,
            command_id,
            command,
        }
    }

    pub fn with_transaction_sequence(mut self, transaction_id: u8) -> Self {
        self.transaction_sequence_number = transaction_id;
        self
    }
}

/// An application message with its ZCL frame decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZclIncomingMessage {
    pub cluster_id: u16,
    pub src_address: NetworkAddress,
    pub src_endpoint: u8,
    pub dst_endpoint: u8,
    pub link_quality: u8,
    pub frame: ZclFrame,
}

impl ZclIncomingMessage {
    pub fn from_af(message: &AfIncomingMessage, frame: ZclFrame) -> Self {
        Self {
            cluster_id: message.cluster_id,
            src_address: message.src_address,
            src_endpoint: message.src_endpoint,
            dst_endpoint: message.dst_endpoint,
            link_quality: message.link_quality,
            frame,
        }
    }

    pub fn transaction_id(&self) -> u8 {
        self.frame.transaction_sequence_number
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataRequestOptions {
    pub ack_request: bool,
    pub discover_route: bool,
    pub security: bool,
}

/// Application data send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequest {
    pub dst_address: NetworkAddress,
    pub dst_endpoint: u8,
    pub src_endpoint: u8,
    pub cluster_id: u16,
    pub transaction_id: u8,
    pub options: DataRequestOptions,
    pub radius: u8,
    pub payload: Vec<u8>,
}

/// Where a binding points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindTarget {
    Group(u16),
    Device { ieee_address: IeeeAddress, endpoint: u8 },
}

/// Bind/unbind request sent to `destination`, the device holding the
/// binding table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindRequest {
    pub destination: NetworkAddress,
    pub src_ieee_address: IeeeAddress,
    pub src_endpoint: u8,
    pub cluster_id: u16,
    pub target: BindTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    Hard,
    Soft,
}

/// Bit mask of enabled radio channels 11..=26.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelMask(pub u32);

impl ChannelMask {
    /// Build a mask, returning the first channel outside 11..=26 on failure.
    pub fn from_channels(channels: &[u8]) -> Result<Self, u8> {
        let mut mask = 0u32;
        for &channel in channels {
            if !(11..=26).contains(&channel) {
                return Err(channel);
            }
            mask |= 1 << channel;
        }
        Ok(ChannelMask(mask))
    }

    pub fn contains(&self, channel: u8) -> bool {
        channel < 32 && self.0 & (1 << channel) != 0
    }
}

/// An application endpoint the coordinator registers on itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRegistration {
    pub endpoint: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub device_version: u8,
    pub in_clusters: Vec<u16>,
    pub out_clusters: Vec<u16>,
}

/// Radio configuration commands issued during coordinator startup.
///
/// Their effect on the radio is the transport's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigCommand {
    SetTime { year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8 },
    SetPreConfigKey([u8; 16]),
    WriteConfiguration { id: u8, value: Vec<u8> },
    SetPanId(u16),
    SetExtendedAddress(IeeeAddress),
    SetChannels(ChannelMask),
    EnableCallbacks,
    StartRequest,
    SetLed { led_id: u8, on: bool },
    RegisterEndpoint(EndpointRegistration),
    PermitJoin { destination: NetworkAddress, timeout: u8 },
}
