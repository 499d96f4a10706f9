//! Single-consumer registration queue.
//!
//! Exactly one worker drains the queue, so at most one discovery is in
//! flight at any time.

use shared_types::DeviceAnnounce;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use zs_03_device_registry::DeviceStore;

use crate::domain::DiscoveryOutcome;
use crate::ports::DeviceInterrogator;
use crate::service::DeviceLifecycleService;

pub const DEFAULT_REGISTRATION_QUEUE: usize = 100;

/// Create the announce queue shared by the bus adapter and the worker.
pub fn registration_queue(
    capacity: usize,
) -> (mpsc::Sender<DeviceAnnounce>, mpsc::Receiver<DeviceAnnounce>) {
    mpsc::channel(capacity)
}

pub struct RegistrationWorker<S, I> {
    service: Arc<DeviceLifecycleService<S, I>>,
    queue: mpsc::Receiver<DeviceAnnounce>,
}

impl<S, I> RegistrationWorker<S, I>
where
    S: DeviceStore,
    I: DeviceInterrogator,
{
    pub fn new(
        service: Arc<DeviceLifecycleService<S, I>>,
        queue: mpsc::Receiver<DeviceAnnounce>,
    ) -> Self {
        Self { service, queue }
    }

    /// Process announces one at a time until every sender is dropped.
    pub async fn run(mut self) {
        info!("[zs-05] Registration worker started");
        while let Some(announce) = self.queue.recv().await {
            // Failures are logged by the service; a new announce retries.
            if let Ok(outcome) = self.service.register_device(&announce).await {
                match outcome {
                    DiscoveryOutcome::Registered(device) => {
                        debug!(ieee = %device.ieee_address, "[zs-05] Registration complete")
                    }
                    DiscoveryOutcome::BecameAvailable(device) => {
                        debug!(ieee = %device.ieee_address, "[zs-05] Device available again")
                    }
                }
            }
        }
        info!("[zs-05] Registration queue closed, exiting");
    }
}
