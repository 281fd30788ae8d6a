//! Client error types.

use lectern_proto::ProtocolError;
use thiserror::Error;

/// Errors from client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client is in the wrong mode for the operation.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Description of the state error.
        reason: String,
    },

    /// Frame parsing or validation failed.
    #[error("invalid frame: {0}")]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// A malformed server frame means the connection can no longer be
    /// trusted. Mode errors are user mistakes and leave the client usable.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Protocol(_) => true,
            Self::InvalidState { .. } => false,
        }
    }

    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState { reason: reason.into() }
    }
}
