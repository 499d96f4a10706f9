//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::EventFilter;
use crate::subscriber::{EventStream, ListenerRegistry, ListenerSlot, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::events::InboundEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Trait for publishing events to the bus.
///
/// The inbound pump is the only production publisher; tests publish
/// directly to simulate the radio.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// # Returns
    ///
    /// The number of receivers the event was handed to.
    async fn publish(&self, event: InboundEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast`: every receiver owns a cursor into one
/// shared ring buffer, so publishing never waits on a listener. A listener
/// that falls more than `capacity` events behind skips the oldest ones.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<InboundEvent>,

    /// Registered listener tracking.
    listeners: Arc<ListenerRegistry>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            listeners: Arc::new(ListenerRegistry::default()),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Prepare a listener positioned at the current end of the stream.
    ///
    /// The slot sees every event published from now on, but only counts as
    /// a listener once `ListenerSlot::register` is called.
    #[must_use]
    pub fn prepare(&self, filter: EventFilter) -> ListenerSlot {
        ListenerSlot::new(self.sender.subscribe(), filter, self.listeners.clone())
    }

    /// Register a listener for events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.prepare(filter).register()
    }

    /// Get a stream of events matching a filter.
    ///
    /// This is a convenience method that returns an `EventStream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.active_count()
    }

    /// Number of listeners registered since the bus was created.
    #[must_use]
    pub fn registrations_total(&self) -> u64 {
        self.listeners.registered_total()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: InboundEvent) -> usize {
        let kind = event.kind();

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(kind = %kind, receivers = receiver_count, "Event published");
                receiver_count
            }
            Err(_) => {
                // Nobody is listening; nothing to deliver.
                trace!(kind = %kind, "Event published with no receivers");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
