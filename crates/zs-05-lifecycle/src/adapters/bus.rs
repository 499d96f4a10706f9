//! # Lifecycle Bus Adapter
//!
//! Connects the lifecycle service to the shared event bus.
//!
//! ## Event Flow
//!
//! ```text
//! [Event Bus] ──DeviceAnnounce──→ registration queue ──→ [RegistrationWorker]
//!      │
//!      ├──DeviceLeave──────→ unregister_device ──→ unregistered queue
//!      ├──IncomingMessage──→ route_incoming ─────→ incoming message queue
//!      └──TrustCenterJoin──→ logged
//! ```
//!
//! The adapter never waits on a consumer: announces that do not fit in the
//! registration queue are dropped and the device must announce again.

use shared_bus::{EventFilter, EventStream, InMemoryEventBus};
use shared_types::{DeviceAnnounce, EventKind, InboundEvent};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};
use zs_03_device_registry::DeviceStore;

use crate::ports::DeviceInterrogator;
use crate::service::DeviceLifecycleService;

/// Routes lifecycle events from the bus to the service.
pub struct LifecycleBusAdapter<S, I> {
    service: Arc<DeviceLifecycleService<S, I>>,
    events: EventStream,
    registrations: mpsc::Sender<DeviceAnnounce>,
}

impl<S, I> LifecycleBusAdapter<S, I>
where
    S: DeviceStore,
    I: DeviceInterrogator,
{
    /// Subscribes immediately; events published after this returns are
    /// delivered to `run`.
    pub fn new(
        service: Arc<DeviceLifecycleService<S, I>>,
        bus: &InMemoryEventBus,
        registrations: mpsc::Sender<DeviceAnnounce>,
    ) -> Self {
        let events = bus.event_stream(EventFilter::kinds(Self::subscriptions()));
        Self {
            service,
            events,
            registrations,
        }
    }

    /// Event kinds this adapter consumes.
    pub fn subscriptions() -> Vec<EventKind> {
        vec![
            EventKind::DeviceAnnounce,
            EventKind::DeviceLeave,
            EventKind::TrustCenterJoin,
            EventKind::IncomingMessage,
        ]
    }

    /// Run until the bus shuts down.
    pub async fn run(mut self) {
        info!("[zs-05] Lifecycle bus adapter started");
        while let Some(event) = self.events.next().await {
            self.handle_event(event);
        }
        info!("[zs-05] Event bus closed, exiting");
    }

    pub fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::DeviceAnnounce(announce) => self.enqueue(announce),
            InboundEvent::DeviceLeave(leave) => {
                if let Err(e) = self.service.unregister_device(&leave) {
                    error!(ieee = %leave.ieee_address, error = %e, "[zs-05] Failed to remove device");
                }
            }
            InboundEvent::TrustCenterJoin(join) => self.service.observe_trust_center_join(&join),
            InboundEvent::IncomingMessage(message) => {
                self.service.route_incoming(message);
            }
            other => debug!(kind = %other.kind(), "[zs-05] Ignoring event"),
        }
    }

    fn enqueue(&self, announce: DeviceAnnounce) {
        let ieee = announce.ieee_address;
        match self.registrations.try_send(announce) {
            Ok(()) => debug!(ieee = %ieee, "[zs-05] Announce queued for registration"),
            Err(TrySendError::Full(_)) => {
                warn!(ieee = %ieee, "[zs-05] Registration queue full, announce dropped")
            }
            Err(TrySendError::Closed(_)) => {
                warn!(ieee = %ieee, "[zs-05] Registration worker stopped, announce dropped")
            }
        }
    }
}
