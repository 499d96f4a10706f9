//! Error types for the device lifecycle.

use thiserror::Error;
use zs_03_device_registry::StoreError;
use zs_04_requests::RequestError;

use crate::domain::DiscoveryState;

/// Why a discovery was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// A mandatory handshake step failed after its retries.
    #[error("Discovery step {state} failed: {source}")]
    Request {
        state: DiscoveryState,
        #[source]
        source: RequestError,
    },

    /// The device could not be written to the registry.
    #[error("Device store error: {0}")]
    Store(#[from] StoreError),
}

impl DiscoveryError {
    /// State the discovery was in when it failed.
    pub fn state(&self) -> DiscoveryState {
        match self {
            DiscoveryError::Request { state, .. } => *state,
            DiscoveryError::Store(_) => DiscoveryState::Registered,
        }
    }
}
