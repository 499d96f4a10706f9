use parking_lot::RwLock;
use shared_types::{Device, IeeeAddress, NetworkAddress};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::DeviceTable;
use crate::error::StoreError;
use crate::ports::DeviceStore;

/// Device store persisted as a single pretty-printed JSON document.
///
/// Every write serializes the whole table to a temporary file, syncs it and
/// renames it over the previous one while holding the writer lock. The
/// in-memory table only changes once the rename succeeded.
///
/// Writes are blocking file I/O and run on the calling task. Writes happen
/// once per join or leave, so callers invoke them inline; a caller that writes
/// in bursts should move them onto `tokio::task::spawn_blocking`.
pub struct JsonFileDeviceStore {
    table: RwLock<DeviceTable>,
    path: PathBuf,
}

impl JsonFileDeviceStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let table = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => DeviceTable::default(),
            Ok(bytes) => {
                let table: DeviceTable = serde_json::from_slice(&bytes)?;
                info!(
                    path = %path.display(),
                    devices = table.len(),
                    "Loaded device registry"
                );
                table
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No device registry file, starting empty");
                DeviceTable::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            table: RwLock::new(table),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the table, persist the copy, then publish
    /// it. Readers never see a table that is not on disk.
    fn write_with<T>(&self, change: impl FnOnce(&mut DeviceTable) -> T) -> Result<T, StoreError> {
        let mut table = self.table.write();
        let mut next = table.clone();
        let outcome = change(&mut next);
        self.persist(&next)?;
        *table = next;
        Ok(outcome)
    }

    fn persist(&self, table: &DeviceTable) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(table)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), devices = table.len(), "Device registry persisted");
        Ok(())
    }
}

impl DeviceStore for JsonFileDeviceStore {
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
        self.write_with(|table| table.put(device))
    }

    fn remove(&self, ieee_address: IeeeAddress) -> Result<Option<Device>, StoreError> {
        self.write_with(|table| table.remove(ieee_address))
    }

    fn update_network_address(
        &self,
        ieee_address: IeeeAddress,
        network_address: NetworkAddress,
    ) -> Result<Option<Device>, StoreError> {
        self.write_with(|table| table.update_network_address(ieee_address, network_address))
    }

    fn all(&self) -> Vec<Device> {
        self.table.read().devices().cloned().collect()
    }
}
