//! Error types for the transaction correlator

use shared_types::{Status, TransportError};
use thiserror::Error;

/// Errors returned by `TransactionCorrelator::send`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Transaction {transaction_id}: send failed: {source}")]
    Send {
        transaction_id: u8,
        source: TransportError,
    },

    #[error("Transaction {transaction_id}: timeout, no delivery confirmation")]
    ConfirmTimeout { transaction_id: u8 },

    /// The radio reported that delivery failed.
    #[error("Transaction {transaction_id}: invalid transaction status {status}")]
    Status { transaction_id: u8, status: Status },

    #[error("Transaction {transaction_id}: timeout, no response")]
    ResponseTimeout { transaction_id: u8 },

    #[error("Event bus closed")]
    BusClosed,
}

impl TransactionError {
    pub fn transaction_id(&self) -> Option<u8> {
        match self {
            TransactionError::Send { transaction_id, .. }
            | TransactionError::ConfirmTimeout { transaction_id }
            | TransactionError::Status { transaction_id, .. }
            | TransactionError::ResponseTimeout { transaction_id } => Some(*transaction_id),
            TransactionError::BusClosed => None,
        }
    }
}
