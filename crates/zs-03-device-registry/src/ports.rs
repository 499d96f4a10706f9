//! Outbound Ports (Driven Ports)

use shared_types::{Device, IeeeAddress, NetworkAddress};

use crate::error::StoreError;

/// Registry of network members, keyed by IEEE address.
///
/// Reads may run concurrently. A write is visible to readers only after it
/// has been persisted; a failed write leaves the registry unchanged.
pub trait DeviceStore: Send + Sync {
    fn get(&self, ieee_address: IeeeAddress) -> Option<Device>;

    fn get_by_network_address(&self, network_address: NetworkAddress) -> Option<Device>;

    fn exists(&self, ieee_address: IeeeAddress) -> bool;

    /// Insert or replace the record for `device.ieee_address`.
    fn put(&self, device: Device) -> Result<(), StoreError>;

    /// Remove a record, returning it if it was present.
    fn remove(&self, ieee_address: IeeeAddress) -> Result<Option<Device>, StoreError>;

    /// Record a newly observed network address. Returns the updated device,
    /// or `None` if the IEEE address is unknown.
    fn update_network_address(
        &self,
        ieee_address: IeeeAddress,
        network_address: NetworkAddress,
    ) -> Result<Option<Device>, StoreError>;

    /// All records, ordered by IEEE address.
    fn all(&self) -> Vec<Device>;
}
