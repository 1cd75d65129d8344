//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding sync data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The remote payload parsed but fails shape validation.
    #[error("malformed bundle: {message}")]
    MalformedBundle {
        /// Description of the shape violation.
        message: String,
    },

    /// JSON serialization failed.
    #[error("bundle encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Creates a malformed-bundle error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBundle {
            message: message.into(),
        }
    }
}
