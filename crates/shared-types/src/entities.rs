//! # Core Domain Entities
//!
//! Defines the network membership model shared by every subsystem.
//!
//! ## Entities
//!
//! - **Addressing**: `IeeeAddress` (stable identity), `NetworkAddress` (volatile)
//! - **Registry**: `Device`, `Endpoint`, `Cluster`
//! - **Descriptors**: `PowerSource`, `LogicalType`
//! - **Routing**: `DeviceIncomingMessage`

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ipc::ZclIncomingMessage;

// =============================================================================
// ADDRESSING
// =============================================================================

/// Error returned when an address string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid address: {0}")]
pub struct AddressParseError(pub String);

/// 64-bit IEEE (extended) address of a radio.
///
/// This is the only stable identity of a device: it never changes across
/// rejoins, so it is the primary key of the device registry.
///
/// Rendered as colon-separated hex bytes, e.g. `00:11:22:33:44:55:66:77`.
/// Parsing also accepts the `0x00124b00019c2ef9` form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, SerializeDisplay, DeserializeFromStr,
)]
pub struct IeeeAddress(pub u64);

impl IeeeAddress {
    /// Big-endian byte representation.
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for IeeeAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex: String = if let Some(rest) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            rest.to_string()
        } else {
            let parts: Vec<&str> = trimmed.split(':').collect();
            if parts.len() != 8 || parts.iter().any(|p| p.len() != 2) {
                return Err(AddressParseError(s.to_string()));
            }
            parts.concat()
        };

        if hex.is_empty() || hex.len() > 16 {
            return Err(AddressParseError(s.to_string()));
        }
        u64::from_str_radix(&hex, 16)
            .map(IeeeAddress)
            .map_err(|_| AddressParseError(s.to_string()))
    }
}

/// 16-bit network (short) address.
///
/// Assigned by the network on join and reassigned on rejoin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, SerializeDisplay, DeserializeFromStr,
)]
pub struct NetworkAddress(pub u16);

impl NetworkAddress {
    /// Address of the network coordinator.
    pub const COORDINATOR: NetworkAddress = NetworkAddress(0x0000);
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl FromStr for NetworkAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if hex.is_empty() || hex.len() > 4 {
            return Err(AddressParseError(s.to_string()));
        }
        u16::from_str_radix(hex, 16)
            .map(NetworkAddress)
            .map_err(|_| AddressParseError(s.to_string()))
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Primary power source reported by the Basic cluster (attribute `0x0007`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerSource {
    #[default]
    Unknown,
    MainsSinglePhase,
    MainsTwoPhase,
    Battery,
    DcSource,
    EmergencyMainsConstantlyPowered,
    EmergencyMainsAndTransfer,
}

impl From<u64> for PowerSource {
    fn from(value: u64) -> Self {
        // Bit 7 flags a secondary battery backup; only the low bits name the source.
        match value & 0x7F {
            1 => PowerSource::MainsSinglePhase,
            2 => PowerSource::MainsTwoPhase,
            3 => PowerSource::Battery,
            4 => PowerSource::DcSource,
            5 => PowerSource::EmergencyMainsConstantlyPowered,
            6 => PowerSource::EmergencyMainsAndTransfer,
            _ => PowerSource::Unknown,
        }
    }
}

/// Logical role of a node in the network, from its node descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Coordinator,
    Router,
    EndDevice,
}

impl LogicalType {
    /// Decode the 3-bit logical type field of a node descriptor.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0 => Some(LogicalType::Coordinator),
            1 => Some(LogicalType::Router),
            2 => Some(LogicalType::EndDevice),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Coordinator => "Coordinator",
            LogicalType::Router => "Router",
            LogicalType::EndDevice => "EndDevice",
        };
        f.write_str(name)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// A cluster advertised by an endpoint.
///
/// `name` is present only when the codec recognises the cluster id, in which
/// case `supported` is also set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u16,
    pub name: Option<String>,
    pub supported: bool,
}

impl Cluster {
    /// Build a cluster reference from an optional codec-provided name.
    pub fn resolve(id: u16, name: Option<String>) -> Self {
        Self {
            id,
            supported: name.is_some(),
            name,
        }
    }
}

/// An application endpoint on a device, built from its simple descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint number, unique within the device.
    pub id: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub device_version: u8,
    pub in_clusters: Vec<Cluster>,
    pub out_clusters: Vec<Cluster>,
}

/// A registered network member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable identity and registry key.
    pub ieee_address: IeeeAddress,
    /// Most recently observed network address.
    pub network_address: NetworkAddress,
    pub manufacturer: String,
    pub manufacturer_id: u16,
    pub model: String,
    pub logical_type: LogicalType,
    /// Taken from the capability flags of the join announce.
    pub main_powered: bool,
    pub power_source: PowerSource,
    pub endpoints: Vec<Endpoint>,
}

impl Device {
    /// Look up an endpoint by number.
    pub fn endpoint(&self, id: u8) -> Option<&Endpoint> {
        self.endpoints.iter().find(|ep| ep.id == id)
    }
}

/// A decoded application message paired with the device that sent it.
#[derive(Debug, Clone)]
pub struct DeviceIncomingMessage {
    pub device: Device,
    pub message: ZclIncomingMessage,
}
