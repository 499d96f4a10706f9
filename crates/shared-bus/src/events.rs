//! # Event Filtering
//!
//! Events on the bus are `shared_types::InboundEvent`s. Listeners narrow what
//! they receive with an `EventFilter` over the event kind and, optionally,
//! the originating network address.

use serde::{Deserialize, Serialize};
use shared_types::entities::NetworkAddress;
use shared_types::events::{EventKind, InboundEvent};

/// Filter for event subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<EventKind>,
    /// Source addresses to include. Empty means any source, including
    /// events that carry none.
    pub sources: Vec<NetworkAddress>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds,
            sources: Vec::new(),
        }
    }

    /// Create a filter for a single kind.
    #[must_use]
    pub fn kind(kind: EventKind) -> Self {
        Self::kinds(vec![kind])
    }

    /// Restrict the filter to events originating from `source`.
    #[must_use]
    pub fn from_source(mut self, source: NetworkAddress) -> Self {
        self.sources.push(source);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &InboundEvent) -> bool {
        let kind_match = self.kinds.is_empty() || self.kinds.contains(&event.kind());

        let source_match = self.sources.is_empty()
            || event
                .source()
                .is_some_and(|source| self.sources.contains(&source));

        kind_match && source_match
    }

    /// Key used to group active listeners by what they listen for.
    pub(crate) fn registry_key(&self) -> String {
        format!("{:?}", self.kinds)
    }
}
