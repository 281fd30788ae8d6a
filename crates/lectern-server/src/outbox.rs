//! Channel-backed [`Broadcaster`].
//!
//! Every attached connection has a bounded queue drained by its own writer
//! task. Delivery never blocks the engine: a full queue drops the message
//! and a closed queue is skipped.

use std::collections::HashMap;

use bytes::Bytes;
use lectern_core::{Broadcaster, ConnId};
use lectern_proto::ServerMessage;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Outbound queues for live connections.
#[derive(Debug, Default)]
pub struct Outbox {
    peers: HashMap<ConnId, mpsc::Sender<Bytes>>,
}

impl Outbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start delivering to `conn_id`.
    pub fn attach(&mut self, conn_id: ConnId, sender: mpsc::Sender<Bytes>) {
        self.peers.insert(conn_id, sender);
    }

    /// Stop delivering to `conn_id`. Dropping the sender lets the writer
    /// task drain and exit.
    pub fn detach(&mut self, conn_id: ConnId) -> bool {
        self.peers.remove(&conn_id).is_some()
    }

    /// Number of attached connections.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn encode(message: &ServerMessage) -> Option<Bytes> {
        let mut buf = Vec::new();
        match message.to_frame().and_then(|frame| frame.encode(&mut buf)) {
            Ok(()) => Some(Bytes::from(buf)),
            Err(e) => {
                warn!(message = message.name(), error = %e, "failed to encode message");
                None
            },
        }
    }

    fn deliver(conn_id: ConnId, sender: &mpsc::Sender<Bytes>, bytes: Bytes, name: &str) {
        match sender.try_send(bytes) {
            Ok(()) => {},
            Err(TrySendError::Full(_)) => {
                warn!(conn_id, message = name, "outbound queue full, message dropped");
            },
            Err(TrySendError::Closed(_)) => {
                debug!(conn_id, message = name, "writer gone, message dropped");
            },
        }
    }
}

impl Broadcaster for Outbox {
    fn send_to(&mut self, conn_id: ConnId, message: &ServerMessage) {
        let Some(sender) = self.peers.get(&conn_id) else {
            debug!(conn_id, message = message.name(), "recipient not attached");
            return;
        };
        if let Some(bytes) = Self::encode(message) {
            Self::deliver(conn_id, sender, bytes, message.name());
        }
    }

    fn send_to_all(&mut self, message: &ServerMessage) {
        let Some(bytes) = Self::encode(message) else { return };
        for (&conn_id, sender) in &self.peers {
            Self::deliver(conn_id, sender, bytes.clone(), message.name());
        }
        debug!(message = message.name(), recipients = self.peers.len(), "broadcast");
    }

    fn send_to_all_except(&mut self, excluded: ConnId, message: &ServerMessage) {
        let Some(bytes) = Self::encode(message) else { return };
        let mut recipients = 0usize;
        for (&conn_id, sender) in self.peers.iter().filter(|(id, _)| **id != excluded) {
            Self::deliver(conn_id, sender, bytes.clone(), message.name());
            recipients += 1;
        }
        debug!(message = message.name(), excluded, recipients, "broadcast");
    }
}
