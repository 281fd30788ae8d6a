//! In-memory [`Broadcaster`] that records every delivery.

use std::collections::{BTreeMap, BTreeSet};

use lectern_core::{Broadcaster, ConnId};
use lectern_proto::ServerMessage;

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient
    pub to: ConnId,
    /// What was delivered
    pub message: ServerMessage,
}

/// Broadcaster over a known set of connections.
///
/// Broadcasts fan out in ascending connection order so traces are stable.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    connections: BTreeSet<ConnId>,
    log: Vec<Delivery>,
    inboxes: BTreeMap<ConnId, Vec<ServerMessage>>,
}

impl RecordingBroadcaster {
    /// Create an empty broadcaster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a connection reachable.
    pub fn connect(&mut self, conn_id: ConnId) {
        self.connections.insert(conn_id);
    }

    /// Make a connection unreachable. Its inbox is kept.
    pub fn disconnect(&mut self, conn_id: ConnId) {
        self.connections.remove(&conn_id);
    }

    /// Every delivery so far, in order.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.log
    }

    /// Messages a connection has received.
    pub fn inbox(&self, conn_id: ConnId) -> &[ServerMessage] {
        self.inboxes.get(&conn_id).map_or(&[], Vec::as_slice)
    }

    /// Drain and return the delivery log.
    pub fn take(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.log)
    }

    fn record(&mut self, to: ConnId, message: ServerMessage) {
        self.inboxes.entry(to).or_default().push(message);
        self.log.push(Delivery { to, message });
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn send_to(&mut self, conn_id: ConnId, message: &ServerMessage) {
        if self.connections.contains(&conn_id) {
            self.record(conn_id, *message);
        }
    }

    fn send_to_all(&mut self, message: &ServerMessage) {
        let targets: Vec<_> = self.connections.iter().copied().collect();
        for conn_id in targets {
            self.record(conn_id, *message);
        }
    }

    fn send_to_all_except(&mut self, excluded: ConnId, message: &ServerMessage) {
        let targets: Vec<_> = self.connections.iter().copied().filter(|c| *c != excluded).collect();
        for conn_id in targets {
            self.record(conn_id, *message);
        }
    }
}
