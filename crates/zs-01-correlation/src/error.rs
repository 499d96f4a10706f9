//! Error types for the correlation engine

use shared_types::{EventKind, TransportError};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a correlated call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    /// The triggering command was rejected before any wait started.
    #[error("Send failed: {0}")]
    Send(#[from] TransportError),

    #[error("Timed out after {timeout:?} waiting for {expected:?}")]
    Timeout {
        expected: Vec<EventKind>,
        timeout: Duration,
    },

    /// The dispatcher shut down while waiting.
    #[error("Event bus closed")]
    BusClosed,
}

impl CorrelationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CorrelationError::Timeout { .. })
    }
}
