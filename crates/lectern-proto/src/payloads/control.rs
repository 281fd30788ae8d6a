//! Role-control payloads: registration, claims and mode changes.

use serde::{Deserialize, Serialize};

/// Viewer registration.
///
/// Sent once when a deck loads. The slide count is only recorded while
/// nobody is presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterViewer {
    /// Number of slides in the sender's deck
    pub total_slides: u32,
}

/// Request for presenter control.
///
/// # Security
///
/// - **Debug Redaction**: The `Debug` impl redacts `pass` so claim attempts
///   can be logged without leaking the shared secret or guesses at it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPresenter {
    /// Claim secret as typed by the participant
    pub pass: String,
    /// Slide the claimant is currently showing
    pub slide: u32,
}

impl std::fmt::Debug for ClaimPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimPresenter")
            .field("pass", &format_args!("<redacted {} bytes>", self.pass.len()))
            .field("slide", &self.slide)
            .finish()
    }
}

/// Presenter-mode notification.
///
/// `broadcast: true` means the recipient now drives everyone else;
/// `broadcast: false` means nobody presents and the recipient may navigate
/// locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePresenter {
    /// Whether the recipient's navigation is relayed to others
    pub broadcast: bool,
}

/// Follow-mode notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeView {
    /// Slide to jump to; `None` if no presenter has set a position yet
    pub slide: Option<u32>,
}

/// Snapshot answer to a remote registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRemote {
    /// Current slide, 0 if unknown
    pub slide: u32,
    /// Deck length, 0 if unknown
    pub total_slides: u32,
}
