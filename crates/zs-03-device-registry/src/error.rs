use thiserror::Error;

/// Errors from device store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The stored table could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: e.to_string(),
        }
    }
}
