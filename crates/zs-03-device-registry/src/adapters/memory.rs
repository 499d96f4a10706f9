use parking_lot::RwLock;
use shared_types::{Device, IeeeAddress, NetworkAddress};

use crate::domain::DeviceTable;
use crate::error::StoreError;
use crate::ports::DeviceStore;

/// Volatile device store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryDeviceStore {
    table: RwLock<DeviceTable>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: impl IntoIterator<Item = Device>) -> Self {
        let mut table = DeviceTable::default();
        for device in devices {
            table.put(device);
        }
        Self {
            table: RwLock::new(table),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

impl DeviceStore for InMemoryDeviceStore {
    fn get(&self, ieee_address: IeeeAddress) -> Option<Device> {
        self.table.read().get(ieee_address).cloned()
    }

    fn get_by_network_address(&self, network_address: NetworkAddress) -> Option<Device> {
        self.table
            .read()
            .get_by_network_address(network_address)
            .cloned()
    }

    fn exists(&self, ieee_address: IeeeAddress) -> bool {
        self.table.read().get(ieee_address).is_some()
    }

    fn put(&self, device: Device) -> Result<(), StoreError> {
        self.table.write().put(device);
        Ok(())
    }

    fn remove(&self, ieee_address: IeeeAddress) -> Result<Option<Device>, StoreError> {
        Ok(self.table.write().remove(ieee_address))
    }

    fn update_network_address(
        &self,
        ieee_address: IeeeAddress,
        network_address: NetworkAddress,
    ) -> Result<Option<Device>, StoreError> {
        Ok(self
            .table
            .write()
            .update_network_address(ieee_address, network_address))
    }

    fn all(&self) -> Vec<Device> {
        self.table.read().devices().cloned().collect()
    }
}
