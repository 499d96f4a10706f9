//! # Steward Runtime
//!
//! Owns every subsystem instance and the tasks that connect them.
//!
//! ## Startup Phases
//!
//! 1. Shared infrastructure: bus, device database, request operations,
//!    lifecycle service
//! 2. Transport: inbound pump and transport error logger
//! 3. Lifecycle: bus adapter and registration worker
//! 4. Coordinator: radio startup sequence
//!
//! Listeners are running before the radio is reset, so the reset
//! indications of phase 4 and early device announces are not missed.

use shared_bus::InMemoryEventBus;
use shared_types::{ClusterCodec, CoordinatorTransport};
use std::sync::Arc;
use steward_telemetry::register_metrics;
use tokio::task::JoinHandle;
use tracing::{info, instrument};
use zs_02_transactions::TransactionIdProvider;
use zs_03_device_registry::{DeviceStore, JsonFileDeviceStore};
use zs_04_requests::CoordinatorRequests;
use zs_05_lifecycle::{
    registration_queue, DeviceLifecycleService, LifecycleBusAdapter, NotificationReceivers,
    Notifications, RegistrationWorker,
};

use crate::container::config::StewardConfig;
use crate::error::RuntimeError;
use crate::startup::{CoordinatorInfo, CoordinatorStartup};
use crate::wiring::{log_transport_errors, InboundPump};

/// Lifecycle service as wired by the runtime.
pub type Lifecycle<T, C> = DeviceLifecycleService<JsonFileDeviceStore, CoordinatorRequests<T, C>>;

/// Handle to a running gateway.
pub struct StewardRuntime<T, C> {
    bus: Arc<InMemoryEventBus>,
    requests: CoordinatorRequests<T, C>,
    devices: Arc<JsonFileDeviceStore>,
    lifecycle: Arc<Lifecycle<T, C>>,
    notifications: Option<NotificationReceivers>,
    coordinator: CoordinatorInfo,
    tasks: Vec<JoinHandle<()>>,
}

impl<T, C> StewardRuntime<T, C>
where
    T: CoordinatorTransport,
    C: ClusterCodec,
{
    /// Wire all subsystems, start the transport and bring up the network.
    ///
    /// On failure every task spawned so far is aborted.
    #[instrument(name = "runtime_start", skip_all)]
    pub async fn start(
        config: StewardConfig,
        transport: Arc<T>,
        codec: Arc<C>,
    ) -> Result<Self, RuntimeError> {
        info!("Starting steward runtime");
        config.validate()?;
        register_metrics()?;

        info!("Phase 1: Creating shared infrastructure");
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.queues.bus));
        let devices = Arc::new(JsonFileDeviceStore::open(&config.storage.database_path)?);
        info!(
            path = %config.storage.database_path.display(),
            devices = devices.all().len(),
            "  Device database opened"
        );
        let requests = CoordinatorRequests::new(
            transport.clone(),
            codec.clone(),
            bus.clone(),
            Arc::new(TransactionIdProvider::new()),
            config.requests,
        );
        let (notifications, receivers) = Notifications::channel(config.queues.notifications);
        let lifecycle = Arc::new(DeviceLifecycleService::new(
            devices.clone(),
            Arc::new(requests.clone()),
            notifications,
        ));

        info!("Phase 2: Starting transport");
        let streams = transport.start().await?;
        let mut tasks = vec![
            tokio::spawn(InboundPump::new(streams.events, bus.clone(), codec).run()),
            tokio::spawn(log_transport_errors(streams.errors)),
        ];

        info!("Phase 3: Starting device lifecycle");
        let (registrations, queue) = registration_queue(config.queues.registration);
        let adapter = LifecycleBusAdapter::new(lifecycle.clone(), &bus, registrations);
        tasks.push(tokio::spawn(adapter.run()));
        tasks.push(tokio::spawn(
            RegistrationWorker::new(lifecycle.clone(), queue).run(),
        ));

        info!("Phase 4: Starting coordinator");
        let startup = CoordinatorStartup::new(requests.clone(), config.network.clone());
        let coordinator = match startup.run().await {
            Ok(coordinator) => coordinator,
            Err(e) => {
                tasks.iter().for_each(JoinHandle::abort);
                return Err(e);
            }
        };

        info!(
            ieee = %coordinator.ieee_address,
            nwk = %coordinator.network_address,
            "Steward runtime started"
        );
        Ok(Self {
            bus,
            requests,
            devices,
            lifecycle,
            notifications: Some(receivers),
            coordinator,
            tasks,
        })
    }

    /// Request operations for application code.
    pub fn requests(&self) -> &CoordinatorRequests<T, C> {
        &self.requests
    }

    pub fn devices(&self) -> &Arc<JsonFileDeviceStore> {
        &self.devices
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn lifecycle(&self) -> &Arc<Lifecycle<T, C>> {
        &self.lifecycle
    }

    pub fn coordinator(&self) -> CoordinatorInfo {
        self.coordinator
    }
}

impl<T, C> StewardRuntime<T, C> {
    /// Hand the notification queues to their single consumer. Returns
    /// `None` after the first call.
    pub fn take_notifications(&mut self) -> Option<NotificationReceivers> {
        self.notifications.take()
    }

    /// Stop every spawned task.
    pub fn shutdown(mut self) {
        info!(tasks = self.tasks.len(), "Shutting down steward runtime");
        self.abort_tasks();
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl<T, C> Drop for StewardRuntime<T, C> {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
