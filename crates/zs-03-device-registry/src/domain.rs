//! The device table shared by every store implementation.

use serde::{Deserialize, Serialize};
use shared_types::{Device, IeeeAddress, NetworkAddress};
use std::collections::BTreeMap;

/// Whole-registry snapshot; also the on-disk document.
///
/// Network addresses are reassigned on rejoin, so a departed device may
/// still hold an address that a live device has since taken. The address
/// index always points at the record written most recently for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TableDocument")]
pub struct DeviceTable {
    devices: BTreeMap<IeeeAddress, Device>,
    #[serde(skip)]
    by_network_address: BTreeMap<NetworkAddress, IeeeAddress>,
}

#[derive(Deserialize)]
struct TableDocument {
    #[serde(default)]
    devices: BTreeMap<IeeeAddress, Device>,
}

impl From<TableDocument> for DeviceTable {
    fn from(document: TableDocument) -> Self {
        let by_network_address = document
            .devices
            .values()
            .map(|device| (device.network_address, device.ieee_address))
            .collect();
        Self {
            devices: document.devices,
            by_network_address,
        }
    }
}

impl DeviceTable {
    pub fn get(&self, ieee_address: IeeeAddress) -> Option<&Device> {
        self.devices.get(&ieee_address)
    }

    pub fn get_by_network_address(&self, network_address: NetworkAddress) -> Option<&Device> {
        let ieee_address = self.by_network_address.get(&network_address)?;
        self.devices.get(ieee_address)
    }

    pub fn put(&mut self, device: Device) {
        self.release_address_of(device.ieee_address);
        self.by_network_address
            .insert(device.network_address, device.ieee_address);
        self.devices.insert(device.ieee_address, device);
    }

    pub fn remove(&mut self, ieee_address: IeeeAddress) -> Option<Device> {
        self.release_address_of(ieee_address);
        self.devices.remove(&ieee_address)
    }

    pub fn update_network_address(
        &mut self,
        ieee_address: IeeeAddress,
        network_address: NetworkAddress,
    ) -> Option<Device> {
        if !self.devices.contains_key(&ieee_address) {
            return None;
        }
        self.release_address_of(ieee_address);
        self.by_network_address.insert(network_address, ieee_address);
        let device = self.devices.get_mut(&ieee_address)?;
        device.network_address = network_address;
        Some(device.clone())
    }

    /// Records ordered by IEEE address.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Drop the index entry for `ieee_address`, unless another device has
    /// taken that address since.
    fn release_address_of(&mut self, ieee_address: IeeeAddress) {
        let Some(previous) = self.devices.get(&ieee_address).map(|d| d.network_address) else {
            return;
        };
        if self.by_network_address.get(&previous) == Some(&ieee_address) {
            self.by_network_address.remove(&previous);
        }
    }
}
