//! Session bookkeeping errors.
//!
//! None of these are protocol-visible. Protocol-level failures (a wrong claim
//! secret, `goto` from a non-presenter) are silently ignored by the engine
//! and never produce an error.

use thiserror::Error;

use crate::registry::ConnId;

/// Errors from [`crate::SessionEngine`] bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Event references a connection that is not registered.
    #[error("unknown connection: {0:#018x}")]
    UnknownConnection(ConnId),

    /// Connection identifier is already registered.
    #[error("connection already registered: {0:#018x}")]
    DuplicateConnection(ConnId),

    /// Registry is full.
    #[error("connection limit reached ({max})")]
    CapacityExceeded {
        /// Configured maximum
        max: usize,
    },
}
