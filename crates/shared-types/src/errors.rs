//! # Error Types
//!
//! Defines error types shared by the transport and codec boundaries.

use thiserror::Error;

use crate::ipc::Status;

/// Errors raised by a coordinator transport when issuing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The radio acknowledged the command with a non-success status.
    #[error("{operation} rejected by radio: status {status}")]
    Rejected { operation: String, status: Status },

    /// Writing to or reading from the underlying link failed.
    #[error("Transport I/O error: {0}")]
    Io(String),

    /// The transport is no longer running.
    #[error("Transport closed")]
    Closed,

    /// The application payload could not be built, nothing was sent.
    #[error("Payload encoding failed: {0}")]
    Encoding(CodecError),
}

/// Errors raised while decoding or encoding application frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload ended before the frame was complete.
    #[error("Truncated frame: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },

    /// The frame could not be interpreted for this cluster.
    #[error("Malformed frame for cluster 0x{cluster_id:04x}: {reason}")]
    Malformed { cluster_id: u16, reason: String },

    /// The command cannot be encoded by this codec.
    #[error("Unsupported command 0x{command_id:02x} for cluster 0x{cluster_id:04x}")]
    Unsupported { cluster_id: u16, command_id: u8 },
}
