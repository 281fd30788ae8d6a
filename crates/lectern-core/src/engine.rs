//! Role protocol engine.
//!
//! Interprets every inbound event against the session state and connection
//! registry and returns the resulting deliveries.
//!
//! ## Transitions
//!
//! | Message | Allowed from | Effect |
//! |---|---|---|
//! | `register-viewer` | anyone | records deck length while nobody presents |
//! | `follow-presenter` | viewers | none |
//! | `register-remote` | anyone | none |
//! | `release-presenter` | presenter | presenter cleared |
//! | `claim-presenter` | anyone with the secret | presenter replaced, slide set |
//! | `goto` | presenter | slide set |
//! | disconnect | anyone | presenter, slide and deck length cleared if it was the presenter |
//!
//! Messages from a connection that is not allowed to send them are dropped
//! without any reply. A wrong claim secret looks exactly like silence.

use lectern_proto::{ClaimPresenter, ClientMessage, ServerMessage};
use tracing::{debug, info};

use crate::{
    env::Environment,
    error::SessionError,
    registry::{ConnId, ConnectionRegistry, Role, SessionInfo},
    secret::ClaimSecret,
    session::SessionState,
};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum simultaneous connections
    pub max_connections: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_connections: 10_000 }
    }
}

/// Input to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Transport accepted a connection.
    Connected {
        /// New connection
        conn_id: ConnId,
    },

    /// A connection sent a protocol message.
    Message {
        /// Sender
        conn_id: ConnId,
        /// Decoded message
        message: ClientMessage,
    },

    /// Transport lost a connection.
    Disconnected {
        /// Departed connection
        conn_id: ConnId,
    },
}

/// Delivery requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Deliver to one connection.
    SendTo {
        /// Recipient
        conn_id: ConnId,
        /// Message
        message: ServerMessage,
    },

    /// Deliver to every connection.
    SendToAll {
        /// Message
        message: ServerMessage,
    },

    /// Deliver to every connection except one.
    SendToAllExcept {
        /// Connection left out
        excluded: ConnId,
        /// Message
        message: ServerMessage,
    },
}

/// Presenter/viewer state machine.
///
/// Pure state machine: returns actions, caller handles I/O.
pub struct SessionEngine<E: Environment> {
    env: E,
    state: SessionState,
    registry: ConnectionRegistry,
}

impl<E: Environment> SessionEngine<E> {
    /// Create an engine guarding presenter control with `secret`.
    pub fn new(env: E, config: &SessionConfig, secret: ClaimSecret) -> Self {
        Self {
            env,
            state: SessionState::new(secret),
            registry: ConnectionRegistry::new(config.max_connections),
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Live connections.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Effective role of a connection, `None` if not connected.
    pub fn role_of(&self, conn_id: ConnId) -> Option<Role> {
        let role = self.registry.role(conn_id)?;
        if self.state.is_presenter(conn_id) { Some(Role::Presenter) } else { Some(role) }
    }

    /// Process an event and return the resulting deliveries.
    ///
    /// # Errors
    ///
    /// Only bookkeeping errors: unknown or duplicate connections and a full
    /// registry. Protocol violations are not errors.
    pub fn process_event(
        &mut self,
        event: SessionEvent,
    ) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::Connected { conn_id } => {
                self.registry.register(conn_id, self.env.now())?;
                debug!(conn_id, connections = self.registry.len(), "connection registered");
                Ok(Vec::new())
            },
            SessionEvent::Message { conn_id, message } => self.handle_message(conn_id, message),
            SessionEvent::Disconnected { conn_id } => self.handle_disconnect(conn_id),
        }
    }

    fn handle_message(
        &mut self,
        conn_id: ConnId,
        message: ClientMessage,
    ) -> Result<Vec<SessionAction>, SessionError> {
        self.registry.record_message(conn_id)?;

        let actions = match message {
            ClientMessage::RegisterViewer(p) => self.handle_register_viewer(conn_id, p.total_slides),
            ClientMessage::FollowPresenter => self.handle_follow_presenter(conn_id),
            ClientMessage::RegisterRemote => self.handle_register_remote(conn_id),
            ClientMessage::ReleasePresenter => self.handle_release_presenter(conn_id),
            ClientMessage::ClaimPresenter(claim) => self.handle_claim_presenter(conn_id, &claim),
            ClientMessage::Goto(p) => self.handle_goto(conn_id, p.slide),
        };
        Ok(actions)
    }

    fn handle_register_viewer(&mut self, conn_id: ConnId, total_slides: u32) -> Vec<SessionAction> {
        self.registry.mark_viewer(conn_id);

        match self.state.presenter() {
            None => {
                self.state.set_total_slides(total_slides);
                vec![SessionAction::SendTo { conn_id, message: ServerMessage::mode_presenter(false) }]
            },
            Some(presenter) => {
                // Reachable when a presenter reloads its deck on the same
                // connection.
                if presenter == conn_id {
                    self.state.set_total_slides(total_slides);
                }
                vec![SessionAction::SendTo {
                    conn_id,
                    message: ServerMessage::mode_view(self.state.current_slide()),
                }]
            },
        }
    }

    fn handle_follow_presenter(&self, conn_id: ConnId) -> Vec<SessionAction> {
        if !self.registry.is_viewer(conn_id) {
            debug!(conn_id, "follow-presenter from unregistered viewer ignored");
            return Vec::new();
        }
        vec![SessionAction::SendTo {
            conn_id,
            message: ServerMessage::mode_view(self.state.current_slide()),
        }]
    }

    fn handle_register_remote(&mut self, conn_id: ConnId) -> Vec<SessionAction> {
        self.registry.mark_remote(conn_id);
        vec![SessionAction::SendTo {
            conn_id,
            message: ServerMessage::InitRemote(self.state.remote_snapshot()),
        }]
    }

    fn handle_release_presenter(&mut self, conn_id: ConnId) -> Vec<SessionAction> {
        if !self.state.is_presenter(conn_id) {
            debug!(conn_id, "release-presenter from non-presenter ignored");
            return Vec::new();
        }

        self.state.clear_presenter();
        info!(conn_id, "presenter released control");
        vec![SessionAction::SendToAll { message: ServerMessage::mode_presenter(false) }]
    }

    fn handle_claim_presenter(
        &mut self,
        conn_id: ConnId,
        claim: &ClaimPresenter,
    ) -> Vec<SessionAction> {
        if !self.state.secret().matches(&claim.pass) {
            debug!(conn_id, ?claim, "claim-presenter with wrong secret ignored");
            return Vec::new();
        }
        if self.state.is_presenter(conn_id) {
            debug!(conn_id, "claim-presenter from current presenter ignored");
            return Vec::new();
        }

        let slide = claim.slide;
        self.state.set_current_slide(slide);

        let mut actions = Vec::with_capacity(2);
        match self.state.set_presenter(conn_id) {
            Some(previous) => {
                info!(conn_id, previous, slide, "presenter control taken over");
                actions.push(SessionAction::SendTo {
                    conn_id: previous,
                    message: ServerMessage::mode_view(Some(slide)),
                });
            },
            None => {
                info!(conn_id, slide, "presenter control claimed");
                actions.push(SessionAction::SendToAllExcept {
                    excluded: conn_id,
                    message: ServerMessage::mode_view(Some(slide)),
                });
            },
        }
        actions.push(SessionAction::SendTo { conn_id, message: ServerMessage::mode_presenter(true) });
        actions
    }

    fn handle_goto(&mut self, conn_id: ConnId, slide: u32) -> Vec<SessionAction> {
        if !self.state.is_presenter(conn_id) {
            debug!(conn_id, slide, "goto from non-presenter ignored");
            return Vec::new();
        }

        self.state.set_current_slide(slide);
        vec![SessionAction::SendToAllExcept { excluded: conn_id, message: ServerMessage::goto(slide) }]
    }

    /// Losing the presenter resets the whole position record, deck length
    /// included, so a remote registering afterwards gets `init-remote{0, 0}`.
    /// This is stricter than `release-presenter`, which keeps both the slide
    /// and the deck length. Keep the two paths distinct.
    fn handle_disconnect(&mut self, conn_id: ConnId) -> Result<Vec<SessionAction>, SessionError> {
        let info: SessionInfo =
            self.registry.unregister(conn_id).ok_or(SessionError::UnknownConnection(conn_id))?;
        let lifetime = self.env.now().saturating_duration_since(info.connected_at);

        if !self.state.is_presenter(conn_id) {
            debug!(conn_id, ?lifetime, messages = info.messages_received, "connection closed");
            return Ok(Vec::new());
        }

        self.state.clear_presenter();
        self.state.clear_current_slide();
        self.state.clear_total_slides();
        info!(conn_id, ?lifetime, "presenter disconnected, control is free");

        Ok(vec![SessionAction::SendToAllExcept {
            excluded: conn_id,
            message: ServerMessage::mode_presenter(false),
        }])
    }
}

impl<E: Environment> std::fmt::Debug for SessionEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("state", &self.state)
            .field("connections", &self.registry.len())
            .finish_non_exhaustive()
    }
}
