//! Error types for remote transports.

use snipsync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur talking to a remote store.
///
/// Absence of the remote object is deliberately *not* represented here:
/// "no bundle yet" is a successful fetch with no payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend could not be reached or answered with a server error.
    #[error("remote unavailable: {message}")]
    RemoteUnavailable {
        /// Underlying failure description.
        message: String,
    },

    /// Credentials or token were rejected by the backend.
    #[error("authentication failed: {message}")]
    AuthFailure {
        /// Underlying failure description.
        message: String,
    },

    /// The remote payload was readable but fails shape validation.
    #[error("malformed remote payload: {0}")]
    Malformed(#[from] ProtocolError),
}

impl TransportError {
    /// Creates a remote-unavailable error.
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Creates an auth-failure error.
    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }
}
