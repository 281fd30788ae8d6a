//! Client state machine.
//!
//! The server never says "no". A claim with the wrong secret is simply not
//! answered, so the client arms a deadline when it claims and reports
//! [`ClientAction::ClaimRejected`] if no `mode-presenter{broadcast:true}`
//! arrives before a later [`ClientEvent::Tick`] passes it.

use std::time::{Duration, Instant};

use lectern_core::Environment;
use lectern_proto::{ClaimPresenter, ClientMessage, Goto, RegisterViewer, ServerMessage};

use crate::{
    error::ClientError,
    event::{ClientAction, ClientEvent, ClientMode},
};

/// Client tunables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long to wait for a claim to be acknowledged.
    pub claim_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { claim_timeout: Duration::from_secs(3) }
    }
}

/// Client state machine.
///
/// Pure state machine - returns actions, caller handles I/O.
///
/// # Type Parameters
///
/// - `E`: Environment implementation for time
pub struct Client<E: Environment> {
    env: E,
    config: ClientConfig,
    mode: ClientMode,
    registered_viewer: bool,
    current_slide: Option<u32>,
    claim_deadline: Option<Instant>,
}

impl<E: Environment> Client<E> {
    /// Create an unregistered client.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self {
            env,
            config,
            mode: ClientMode::Unregistered,
            registered_viewer: false,
            current_slide: None,
            claim_deadline: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    /// Slide currently shown, if known.
    pub fn current_slide(&self) -> Option<u32> {
        self.current_slide
    }

    /// Whether a claim is awaiting an answer.
    pub fn claim_pending(&self) -> bool {
        self.claim_deadline.is_some()
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the event is not valid in the current mode
    /// or a frame cannot be decoded.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::RegisterViewer { total_slides } => {
                self.registered_viewer = true;
                Ok(vec![ClientAction::Send(ClientMessage::RegisterViewer(RegisterViewer {
                    total_slides,
                }))])
            },
            ClientEvent::RegisterRemote => Ok(vec![ClientAction::Send(ClientMessage::RegisterRemote)]),
            ClientEvent::FollowPresenter => self.handle_follow(),
            ClientEvent::ClaimPresenter { pass, slide } => self.handle_claim(pass, slide),
            ClientEvent::ReleasePresenter => self.handle_release(),
            ClientEvent::Navigate { slide } => self.handle_navigate(slide),
            ClientEvent::MessageReceived(message) => Ok(self.handle_message(message)),
            ClientEvent::FrameReceived(frame) => {
                let message = ServerMessage::from_frame(&frame)?;
                Ok(self.handle_message(message))
            },
            ClientEvent::Tick { now } => Ok(self.handle_tick(now)),
        }
    }

    fn handle_follow(&self) -> Result<Vec<ClientAction>, ClientError> {
        if !self.registered_viewer {
            return Err(ClientError::invalid_state("follow requires viewer registration"));
        }
        Ok(vec![ClientAction::Send(ClientMessage::FollowPresenter)])
    }

    fn handle_claim(&mut self, pass: String, slide: u32) -> Result<Vec<ClientAction>, ClientError> {
        if self.mode == (ClientMode::Presenting { broadcast: true }) {
            return Err(ClientError::invalid_state("already presenting"));
        }
        self.claim_deadline = Some(self.env.now() + self.config.claim_timeout);
        Ok(vec![ClientAction::Send(ClientMessage::ClaimPresenter(ClaimPresenter { pass, slide }))])
    }

    fn handle_release(&self) -> Result<Vec<ClientAction>, ClientError> {
        if self.mode != (ClientMode::Presenting { broadcast: true }) {
            return Err(ClientError::invalid_state("not presenting"));
        }
        Ok(vec![ClientAction::Send(ClientMessage::ReleasePresenter)])
    }

    fn handle_navigate(&mut self, slide: u32) -> Result<Vec<ClientAction>, ClientError> {
        match self.mode {
            ClientMode::Presenting { broadcast } => {
                self.current_slide = Some(slide);
                let mut actions = Vec::with_capacity(2);
                if broadcast {
                    actions.push(ClientAction::Send(ClientMessage::Goto(Goto { slide })));
                }
                actions.push(ClientAction::ShowSlide { slide });
                Ok(actions)
            },
            ClientMode::Viewing => Ok(Vec::new()),
            ClientMode::Remote { .. } | ClientMode::Unregistered => {
                Err(ClientError::invalid_state("navigation requires presenter mode"))
            },
        }
    }

    fn handle_message(&mut self, message: ServerMessage) -> Vec<ClientAction> {
        match message {
            ServerMessage::ModePresenter(p) => {
                if p.broadcast {
                    self.claim_deadline = None;
                }
                self.set_mode(ClientMode::Presenting { broadcast: p.broadcast })
            },
            ServerMessage::ModeView(p) => {
                let mut actions = self.set_mode(ClientMode::Viewing);
                if let Some(slide) = p.slide {
                    actions.extend(self.show(slide));
                }
                actions
            },
            ServerMessage::InitRemote(p) => {
                let mut actions = self.set_mode(ClientMode::Remote { total_slides: p.total_slides });
                actions.extend(self.show(p.slide));
                actions
            },
            ServerMessage::Goto(p) => match self.mode {
                ClientMode::Viewing | ClientMode::Remote { .. } => self.show(p.slide),
                ClientMode::Presenting { .. } | ClientMode::Unregistered => Vec::new(),
            },
        }
    }

    fn handle_tick(&mut self, now: Instant) -> Vec<ClientAction> {
        match self.claim_deadline {
            Some(deadline) if now >= deadline => {
                self.claim_deadline = None;
                vec![ClientAction::ClaimRejected]
            },
            _ => Vec::new(),
        }
    }

    fn set_mode(&mut self, mode: ClientMode) -> Vec<ClientAction> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        vec![ClientAction::ModeChanged(mode)]
    }

    fn show(&mut self, slide: u32) -> Vec<ClientAction> {
        self.current_slide = Some(slide);
        vec![ClientAction::ShowSlide { slide }]
    }
}

impl<E: Environment> std::fmt::Debug for Client<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("mode", &self.mode)
            .field("current_slide", &self.current_slide)
            .field("claim_pending", &self.claim_pending())
            .finish_non_exhaustive()
    }
}
