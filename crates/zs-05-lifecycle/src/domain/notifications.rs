//! Bounded notification queues for application code.
//!
//! Producers never wait: when a queue is full the new notification is
//! dropped and counted.

use serde::{Deserialize, Serialize};
use shared_types::{Device, DeviceIncomingMessage};
use steward_telemetry::{metric_inc, NOTIFICATIONS_DROPPED};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Queue sizes for the four notification streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationCapacities {
    pub registered: usize,
    pub became_available: usize,
    pub unregistered: usize,
    pub incoming_message: usize,
}

impl Default for NotificationCapacities {
    fn default() -> Self {
        Self {
            registered: 10,
            became_available: 10,
            unregistered: 10,
            incoming_message: 100,
        }
    }
}

/// Producer side, held by the lifecycle service.
#[derive(Debug, Clone)]
pub struct Notifications {
    registered: mpsc::Sender<Device>,
    became_available: mpsc::Sender<Device>,
    unregistered: mpsc::Sender<Device>,
    incoming_message: mpsc::Sender<DeviceIncomingMessage>,
}

/// Consumer side, handed to application code.
#[derive(Debug)]
pub struct NotificationReceivers {
    pub registered: mpsc::Receiver<Device>,
    pub became_available: mpsc::Receiver<Device>,
    pub unregistered: mpsc::Receiver<Device>,
    pub incoming_message: mpsc::Receiver<DeviceIncomingMessage>,
}

impl Notifications {
    /// Create the four queues.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero.
    pub fn channel(capacities: NotificationCapacities) -> (Self, NotificationReceivers) {
        let (registered_tx, registered_rx) = mpsc::channel(capacities.registered);
        let (available_tx, available_rx) = mpsc::channel(capacities.became_available);
        let (unregistered_tx, unregistered_rx) = mpsc::channel(capacities.unregistered);
        let (message_tx, message_rx) = mpsc::channel(capacities.incoming_message);

        (
            Self {
                registered: registered_tx,
                became_available: available_tx,
                unregistered: unregistered_tx,
                incoming_message: message_tx,
            },
            NotificationReceivers {
                registered: registered_rx,
                became_available: available_rx,
                unregistered: unregistered_rx,
                incoming_message: message_rx,
            },
        )
    }

    pub fn registered(&self, device: Device) -> bool {
        offer("registered", &self.registered, device)
    }

    pub fn became_available(&self, device: Device) -> bool {
        offer("became_available", &self.became_available, device)
    }

    pub fn unregistered(&self, device: Device) -> bool {
        offer("unregistered", &self.unregistered, device)
    }

    pub fn incoming_message(&self, message: DeviceIncomingMessage) -> bool {
        offer("incoming_message", &self.incoming_message, message)
    }
}

fn offer<T>(queue: &'static str, sender: &mpsc::Sender<T>, item: T) -> bool {
    match sender.try_send(item) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            metric_inc!(NOTIFICATIONS_DROPPED, &[queue]);
            warn!(queue, "Notification queue full, dropping notification");
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!(queue, "No consumer for notification queue");
            false
        }
    }
}
