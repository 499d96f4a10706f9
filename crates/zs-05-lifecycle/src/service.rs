//! Device Lifecycle Service
//!
//! Discovery of newly announced devices, leave handling and routing of
//! incoming application messages to their owning device.

use shared_types::{
    Device, DeviceAnnounce, DeviceIncomingMessage, DeviceLeave, TrustCenterJoin,
    ZclIncomingMessage,
};
use std::sync::Arc;
use steward_telemetry::{metric_inc, DEVICES_REGISTERED, DEVICES_UNREGISTERED, DISCOVERY_ABANDONED};
use tracing::{debug, info, instrument, warn};
use zs_03_device_registry::{DeviceStore, StoreError};
use zs_04_requests::RequestError;

use crate::domain::{DeviceDraft, DiscoveryOutcome, DiscoveryState, Notifications};
use crate::error::DiscoveryError;
use crate::ports::DeviceInterrogator;

/// Owns the device registry's lifecycle transitions.
///
/// `register_device` must only be driven by a single task at a time (see
/// `RegistrationWorker`); the other handlers may run concurrently with it.
pub struct DeviceLifecycleService<S, I> {
    store: Arc<S>,
    interrogator: Arc<I>,
    notifications: Notifications,
}

impl<S, I> DeviceLifecycleService<S, I>
where
    S: DeviceStore,
    I: DeviceInterrogator,
{
    pub fn new(store: Arc<S>, interrogator: Arc<I>, notifications: Notifications) -> Self {
        Self {
            store,
            interrogator,
            notifications,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Process one join announce.
    ///
    /// A known device only has its network address refreshed. An unknown
    /// device goes through the full discovery handshake; if a mandatory step
    /// fails nothing is persisted and the device must announce again.
    #[instrument(skip(self, announce), fields(ieee = %announce.ieee_address, nwk = %announce.network_address))]
    pub async fn register_device(
        &self,
        announce: &DeviceAnnounce,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        if self.store.exists(announce.ieee_address) {
            if let Some(device) = self
                .store
                .update_network_address(announce.ieee_address, announce.network_address)?
            {
                info!("Known device became available");
                self.notifications.became_available(device.clone());
                return Ok(DiscoveryOutcome::BecameAvailable(device));
            }
        }

        match self.discover(announce).await {
            Ok(device) => {
                metric_inc!(DEVICES_REGISTERED);
                info!(
                    manufacturer = %device.manufacturer,
                    model = %device.model,
                    endpoints = device.endpoints.len(),
                    "Device registered"
                );
                self.notifications.registered(device.clone());
                Ok(DiscoveryOutcome::Registered(device))
            }
            Err(e) => {
                metric_inc!(DISCOVERY_ABANDONED, &[e.state().as_str()]);
                warn!(state = %e.state(), error = %e, "Discovery abandoned");
                Err(e)
            }
        }
    }

    async fn discover(&self, announce: &DeviceAnnounce) -> Result<Device, DiscoveryError> {
        let network_address = announce.network_address;
        let mut draft = DeviceDraft::new(announce.clone());

        draft.advance(DiscoveryState::AttributesRequested);
        let attributes = self
            .interrogator
            .basic_attributes(network_address)
            .await
            .map_err(abandon(&draft))?;
        debug!(?attributes, "Basic attributes read");
        draft.with_attributes(attributes);

        draft.advance(DiscoveryState::NodeDescribed);
        let node = self
            .interrogator
            .node_descriptor(network_address)
            .await
            .map_err(abandon(&draft))?;
        draft.with_node(node);

        draft.advance(DiscoveryState::EndpointsEnumerated);
        let endpoints = self
            .interrogator
            .active_endpoints(network_address)
            .await
            .map_err(abandon(&draft))?;
        debug!(?endpoints, "Active endpoints");

        for endpoint in endpoints {
            draft.advance(DiscoveryState::EndpointDescribed(endpoint));
            match self
                .interrogator
                .simple_descriptor(network_address, endpoint)
                .await
            {
                Ok(descriptor) => {
                    draft.add_endpoint(descriptor, |id| self.interrogator.cluster_name(id))
                }
                Err(e) => warn!(endpoint, error = %e, "Skipping endpoint without descriptor"),
            }
        }

        draft.advance(DiscoveryState::Registered);
        let device = draft.build();
        self.store.put(device.clone())?;
        Ok(device)
    }

    /// Remove a device that left the network. Unknown devices are ignored.
    #[instrument(skip(self, leave), fields(ieee = %leave.ieee_address))]
    pub fn unregister_device(&self, leave: &DeviceLeave) -> Result<Option<Device>, StoreError> {
        if !self.store.exists(leave.ieee_address) {
            debug!("Leave from unknown device ignored");
            return Ok(None);
        }

        let removed = self.store.remove(leave.ieee_address)?;
        if let Some(device) = &removed {
            metric_inc!(DEVICES_UNREGISTERED);
            info!(rejoin = leave.rejoin, "Device left the network");
            self.notifications.unregistered(device.clone());
        }
        Ok(removed)
    }

    /// Deliver an application message to its owning device's subscribers.
    /// Returns `false` if the source is not a registered device.
    pub fn route_incoming(&self, message: ZclIncomingMessage) -> bool {
        match self.store.get_by_network_address(message.src_address) {
            Some(device) => {
                self.notifications
                    .incoming_message(DeviceIncomingMessage { device, message });
                true
            }
            None => {
                warn!(
                    src = %message.src_address,
                    cluster_id = message.cluster_id,
                    "Message from unknown device dropped"
                );
                false
            }
        }
    }

    /// Trust center joins are observed only.
    pub fn observe_trust_center_join(&self, join: &TrustCenterJoin) {
        debug!(
            ieee = %join.ieee_address,
            nwk = %join.network_address,
            parent = %join.parent_address,
            "Trust center join"
        );
    }
}

fn abandon(draft: &DeviceDraft) -> impl FnOnce(RequestError) -> DiscoveryError {
    let state = draft.state();
    move |source| DiscoveryError::Request { state, source }
}
