//! Operations for model-based testing.
//!
//! Operations represent every input a participant can produce. They are
//! generated randomly and applied to both the model and the real engine.

use arbitrary::Arbitrary;

/// Participant identifier (0-indexed).
pub type ClientId = u8;

/// Inputs that can be applied to the system.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Participant opens a connection.
    Connect {
        /// Participant connecting
        client_id: ClientId,
    },

    /// Participant's connection goes away.
    Disconnect {
        /// Participant disconnecting
        client_id: ClientId,
    },

    /// `register-viewer`.
    RegisterViewer {
        /// Sender
        client_id: ClientId,
        /// Reported deck length
        total_slides: u8,
    },

    /// `register-remote`.
    RegisterRemote {
        /// Sender
        client_id: ClientId,
    },

    /// `follow-presenter`.
    FollowPresenter {
        /// Sender
        client_id: ClientId,
    },

    /// `release-presenter`.
    ReleasePresenter {
        /// Sender
        client_id: ClientId,
    },

    /// `claim-presenter`.
    ClaimPresenter {
        /// Sender
        client_id: ClientId,
        /// Whether the claim carries the real secret
        correct_pass: bool,
        /// Slide the claimant is on
        slide: u8,
    },

    /// `goto`.
    Goto {
        /// Sender
        client_id: ClientId,
        /// Target slide
        slide: u8,
    },
}

impl Operation {
    /// Participant the operation comes from.
    pub fn client_id(&self) -> ClientId {
        match self {
            Self::Connect { client_id }
            | Self::Disconnect { client_id }
            | Self::RegisterViewer { client_id, .. }
            | Self::RegisterRemote { client_id }
            | Self::FollowPresenter { client_id }
            | Self::ReleasePresenter { client_id }
            | Self::ClaimPresenter { client_id, .. }
            | Self::Goto { client_id, .. } => *client_id,
        }
    }
}

/// Result of applying an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// Applied (including silently ignored protocol messages).
    Ok,

    /// Rejected before reaching the protocol.
    Error(OperationError),
}

/// Bookkeeping failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// No such participant.
    InvalidClient,

    /// Participant is not connected.
    NotConnected,

    /// Participant is already connected.
    AlreadyConnected,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperationResult::Ok)
    }
}
