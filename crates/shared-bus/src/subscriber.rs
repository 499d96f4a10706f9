//! # Event Subscriber
//!
//! Defines the listening side of the event bus.
//!
//! A listener goes through two stages:
//!
//! 1. `ListenerSlot`: a receiver positioned at the current tail of the bus.
//!    It buffers every event published from that point on but is not yet a
//!    registered listener.
//! 2. `Subscription`: the slot after `register()`. It counts as an active
//!    listener until it is dropped.
//!
//! Preparing a slot before issuing a command and registering it only once
//! the command was accepted means a reply can never slip past, while a
//! command that fails immediately never creates a listener at all.

use crate::events::EventFilter;
use shared_types::events::InboundEvent;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Bookkeeping of registered listeners, shared by the bus and every
/// subscription it handed out.
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    /// Active listener count by filter key.
    active: RwLock<HashMap<String, usize>>,
    /// Listeners ever registered.
    registered_total: AtomicU64,
}

impl ListenerRegistry {
    pub(crate) fn active_count(&self) -> usize {
        self.active
            .read()
            .map(|active| active.values().sum())
            .unwrap_or(0)
    }

    pub(crate) fn registered_total(&self) -> u64 {
        self.registered_total.load(Ordering::Relaxed)
    }

    fn register(self: &Arc<Self>, key: String) -> Registration {
        if let Ok(mut active) = self.active.write() {
            *active.entry(key.clone()).or_insert(0) += 1;
        }
        self.registered_total.fetch_add(1, Ordering::Relaxed);
        Registration {
            registry: self.clone(),
            key,
        }
    }
}

/// Counted registration; unregisters itself when dropped.
struct Registration {
    registry: Arc<ListenerRegistry>,
    key: String,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Ok(mut active) = self.registry.active.write() else {
            return;
        };
        let Some(count) = active.get_mut(&self.key) else {
            debug!(kinds = %self.key, "Listener unregistered");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            active.remove(&self.key);
        }
        debug!(kinds = %self.key, "Listener unregistered");
    }
}

/// A prepared, not yet registered listener.
///
/// Events published after the slot was created are buffered and will be
/// seen by the `Subscription` it turns into.
pub struct ListenerSlot {
    receiver: broadcast::Receiver<InboundEvent>,
    filter: EventFilter,
    registry: Arc<ListenerRegistry>,
}

impl ListenerSlot {
    pub(crate) fn new(
        receiver: broadcast::Receiver<InboundEvent>,
        filter: EventFilter,
        registry: Arc<ListenerRegistry>,
    ) -> Self {
        Self {
            receiver,
            filter,
            registry,
        }
    }

    /// Turn the slot into a registered listener.
    #[must_use]
    pub fn register(self) -> Subscription {
        let registration = self.registry.register(self.filter.registry_key());
        debug!(kinds = ?self.filter.kinds, "Listener registered");
        Subscription {
            receiver: self.receiver,
            filter: self.filter,
            registration,
        }
    }
}

/// A registered listener.
///
/// When dropped, the listener is automatically unregistered.
pub struct Subscription {
    receiver: broadcast::Receiver<InboundEvent>,
    filter: EventFilter,
    registration: Registration,
}

impl Subscription {
    /// Receive the next event that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next matching event
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<InboundEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        lagged = count,
                        kinds = ?self.filter.kinds,
                        "Listener lagged, oldest events skipped"
                    );
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - No event available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<InboundEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Explicitly unregister. Equivalent to dropping the subscription.
    pub fn unregister(self) {}
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream {
    inner: Pin<Box<dyn Stream<Item = InboundEvent> + Send>>,
    filter: EventFilter,
    _registration: Registration,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        let Subscription {
            receiver,
            filter,
            registration,
        } = subscription;

        let matcher = filter.clone();
        let inner = BroadcastStream::new(receiver).filter_map(move |item| match item {
            Ok(event) if matcher.matches(&event) => Some(event),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(count)) => {
                warn!(
                    lagged = count,
                    kinds = ?matcher.kinds,
                    "Stream lagged, oldest events skipped"
                );
                None
            }
        });

        Self {
            inner: Box::pin(inner),
            filter,
            _registration: registration,
        }
    }

    /// Get the filter for this stream.
    ///
    /// Named apart from `StreamExt::filter`, which would otherwise win method
    /// resolution.
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = InboundEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
