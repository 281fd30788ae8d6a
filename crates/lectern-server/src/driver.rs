//! Server driver.
//!
//! Glues the sans-IO [`SessionEngine`] to the runtime: decodes inbound
//! frames, feeds events to the engine, and executes the resulting actions on
//! the [`Outbox`]. All calls go through `&mut self`, so wrapping the driver
//! in one mutex is enough to apply every message atomically.

use bytes::Bytes;
use lectern_core::{
    ClaimSecret, ConnId, Environment, SessionAction, SessionConfig, SessionEngine, SessionError,
    SessionEvent, dispatch,
};
use lectern_proto::{ClientMessage, Frame, ProtocolError};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::outbox::Outbox;

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum simultaneous connections
    pub max_connections: usize,
    /// Per-connection outbound queue capacity
    pub outbound_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { max_connections: 10_000, outbound_queue: 64 }
    }
}

/// Runtime events.
#[derive(Debug)]
pub enum ServerEvent {
    /// A participant stream was accepted.
    ConnectionAccepted {
        /// Identifier assigned by the runtime
        conn_id: ConnId,
        /// Queue drained by the connection's writer task
        outbound: mpsc::Sender<Bytes>,
    },

    /// A complete frame arrived.
    FrameReceived {
        /// Sender
        conn_id: ConnId,
        /// Undecoded frame
        frame: Frame,
    },

    /// The participant stream ended.
    ConnectionClosed {
        /// Departed connection
        conn_id: ConnId,
        /// Why it ended, for logs
        reason: String,
    },
}

/// Errors from the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Session bookkeeping failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Frame could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Server driver wrapping the session engine and its outbox.
pub struct ServerDriver<E: Environment> {
    engine: SessionEngine<E>,
    outbox: Outbox,
    config: ServerConfig,
}

impl<E: Environment> ServerDriver<E> {
    /// Create a driver guarding presenter control with `secret`.
    pub fn new(env: E, config: ServerConfig, secret: ClaimSecret) -> Self {
        let session = SessionConfig { max_connections: config.max_connections };
        Self { engine: SessionEngine::new(env, &session, secret), outbox: Outbox::new(), config }
    }

    /// Driver configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &SessionEngine<E> {
        &self.engine
    }

    /// Number of attached connections.
    pub fn connection_count(&self) -> usize {
        self.outbox.len()
    }

    /// Apply an event and deliver its results.
    pub fn handle(&mut self, event: ServerEvent) -> Result<(), DriverError> {
        let actions = self.process_event(event)?;
        self.execute(actions);
        Ok(())
    }

    /// Apply an event and return the deliveries it requires.
    ///
    /// A rejected connection is never attached, so it cannot receive
    /// broadcasts.
    pub fn process_event(&mut self, event: ServerEvent) -> Result<Vec<SessionAction>, DriverError> {
        match event {
            ServerEvent::ConnectionAccepted { conn_id, outbound } => {
                let actions = self.engine.process_event(SessionEvent::Connected { conn_id })?;
                self.outbox.attach(conn_id, outbound);
                Ok(actions)
            },
            ServerEvent::FrameReceived { conn_id, frame } => {
                let message = ClientMessage::from_frame(&frame)?;
                debug!(conn_id, message = message.name(), "message received");
                Ok(self.engine.process_event(SessionEvent::Message { conn_id, message })?)
            },
            ServerEvent::ConnectionClosed { conn_id, reason } => {
                debug!(conn_id, %reason, "connection closed");
                self.outbox.detach(conn_id);
                Ok(self.engine.process_event(SessionEvent::Disconnected { conn_id })?)
            },
        }
    }

    /// Deliver actions in emission order.
    pub fn execute(&mut self, actions: Vec<SessionAction>) {
        dispatch(actions, &mut self.outbox);
    }
}

impl<E: Environment> std::fmt::Debug for ServerDriver<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDriver")
            .field("engine", &self.engine)
            .field("connections", &self.outbox.len())
            .field("config", &self.config)
            .finish()
    }
}
