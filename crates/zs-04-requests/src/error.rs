//! Error types for request operations

use shared_types::{CodecError, Status, ZclStatus};
use thiserror::Error;
use zs_01_correlation::CorrelationError;
use zs_02_transactions::TransactionError;

/// Errors returned to callers of `CoordinatorRequests`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0}")]
    Correlation(#[from] CorrelationError),

    #[error("{0}")]
    Transaction(#[from] TransactionError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A device answered a ZDO request with a non-success status.
    #[error("{operation} failed with status {status}")]
    Status { operation: &'static str, status: Status },

    /// The correlated reply did not carry the expected payload.
    #[error("Unexpected response to {operation}: {actual}")]
    UnexpectedResponse {
        operation: &'static str,
        actual: String,
    },

    /// A cluster command was answered with a failing default response.
    #[error("Command 0x{command_id:02x} on cluster 0x{cluster_id:04x} failed: {status:?}")]
    CommandFailed {
        cluster_id: u16,
        command_id: u8,
        status: ZclStatus,
    },
}
