//! Client inputs and outputs.

use std::time::Instant;

use lectern_proto::{ClientMessage, Frame, ServerMessage};

/// What the participant's deck is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Nothing registered yet.
    Unregistered,
    /// The participant controls navigation. With `broadcast` false nobody
    /// presents and navigation stays local.
    Presenting {
        /// Whether navigation is relayed to others
        broadcast: bool,
    },
    /// Mirroring the presenter.
    Viewing,
    /// Remote control with a one-shot snapshot.
    Remote {
        /// Deck length reported by the server
        total_slides: u32,
    },
}

/// Input to the client.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Deck loaded; announce as viewer.
    RegisterViewer {
        /// Slides in the local deck
        total_slides: u32,
    },
    /// Ask for a remote snapshot.
    RegisterRemote,
    /// Resume following the presenter.
    FollowPresenter,
    /// Ask for presenter control.
    ClaimPresenter {
        /// Claim secret
        pass: String,
        /// Slide currently shown
        slide: u32,
    },
    /// Give up presenter control.
    ReleasePresenter,
    /// User navigated locally.
    Navigate {
        /// Target slide
        slide: u32,
    },
    /// Decoded message from the server.
    MessageReceived(ServerMessage),
    /// Raw frame from the server.
    FrameReceived(Frame),
    /// Time advanced.
    Tick {
        /// Current time
        now: Instant,
    },
}

/// Output from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Send a message to the server.
    Send(ClientMessage),
    /// Render a slide.
    ShowSlide {
        /// Slide index
        slide: u32,
    },
    /// Mode changed.
    ModeChanged(ClientMode),
    /// A claim got no `mode-presenter` answer in time: wrong secret.
    ClaimRejected,
}
