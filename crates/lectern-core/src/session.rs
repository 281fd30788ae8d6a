//! Session state: who presents, and where the deck is.

use lectern_proto::InitRemote;

use crate::{registry::ConnId, secret::ClaimSecret};

/// The shared record mutated by [`crate::SessionEngine`].
///
/// Mutators are crate-private; everything outside the engine only reads.
///
/// # Invariants
///
/// - At most one presenter at any time.
/// - `current_slide` only changes through a successful claim, a presenter's
///   `goto`, or the presenter disconnecting.
/// - A presenter was always admitted by matching `secret`.
#[derive(Debug, Clone)]
pub struct SessionState {
    presenter: Option<ConnId>,
    current_slide: Option<u32>,
    total_slides: Option<u32>,
    secret: ClaimSecret,
}

impl SessionState {
    /// Empty session guarded by `secret`.
    pub fn new(secret: ClaimSecret) -> Self {
        Self { presenter: None, current_slide: None, total_slides: None, secret }
    }

    /// Current presenter.
    pub fn presenter(&self) -> Option<ConnId> {
        self.presenter
    }

    /// Whether `conn_id` is the presenter.
    pub fn is_presenter(&self, conn_id: ConnId) -> bool {
        self.presenter == Some(conn_id)
    }

    /// Last slide set by a presenter.
    pub fn current_slide(&self) -> Option<u32> {
        self.current_slide
    }

    /// Last deck length reported by a viewer.
    pub fn total_slides(&self) -> Option<u32> {
        self.total_slides
    }

    /// The claim secret.
    pub fn secret(&self) -> &ClaimSecret {
        &self.secret
    }

    /// Snapshot sent to remotes, with unknown values reported as 0.
    pub fn remote_snapshot(&self) -> InitRemote {
        InitRemote {
            slide: self.current_slide.unwrap_or(0),
            total_slides: self.total_slides.unwrap_or(0),
        }
    }

    pub(crate) fn set_presenter(&mut self, conn_id: ConnId) -> Option<ConnId> {
        self.presenter.replace(conn_id)
    }

    pub(crate) fn clear_presenter(&mut self) -> Option<ConnId> {
        self.presenter.take()
    }

    pub(crate) fn set_current_slide(&mut self, slide: u32) {
        self.current_slide = Some(slide);
    }

    pub(crate) fn clear_current_slide(&mut self) {
        self.current_slide = None;
    }

    pub(crate) fn set_total_slides(&mut self, total: u32) {
        self.total_slides = Some(total);
    }

    pub(crate) fn clear_total_slides(&mut self) {
        self.total_slides = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_defaults_to_zero() {
        let state = SessionState::new(ClaimSecret::new("s"));
        assert_eq!(state.remote_snapshot(), InitRemote { slide: 0, total_slides: 0 });
    }

    #[test]
    fn set_presenter_returns_previous() {
        let mut state = SessionState::new(ClaimSecret::new("s"));

        assert_eq!(state.set_presenter(1), None);
        assert_eq!(state.set_presenter(2), Some(1));
        assert!(state.is_presenter(2));
        assert!(!state.is_presenter(1));
    }
}
