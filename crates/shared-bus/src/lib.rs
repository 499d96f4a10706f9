//! # Shared Bus - Broadcast Dispatcher
//!
//! Fans every inbound radio event out to any number of transient listeners.
//!
//! ## Dispatch Rules
//!
//! - Every registered listener receives every published event it filters
//!   for, in publish order.
//! - Publishing never blocks on a listener; each listener reads from its own
//!   cursor into a bounded ring buffer.
//! - Listeners only see events published after they were prepared. There is
//!   no replay.
//!
//! ```text
//!                         ┌──────────────┐
//!  inbound pump ────────► │  Event Bus   │ ──► correlated call (transient)
//!        publish()        │              │ ──► transaction correlator
//!                         └──────────────┘ ──► lifecycle bus adapter
//!                                             subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::EventFilter;
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, ListenerSlot, Subscription, SubscriptionError};

/// Events buffered per listener before the slowest starts skipping.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
