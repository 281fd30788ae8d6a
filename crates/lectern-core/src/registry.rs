//! Connection registry.
//!
//! Tracks live connections and the role each one has registered for.
//! Removal hands back the entry exactly once, which is what guarantees the
//! engine's disconnect transition runs once per connection.

use std::{collections::HashMap, time::Instant};

use crate::error::SessionError;

/// Runtime connection identifier.
pub type ConnId = u64;

/// Role a connection currently plays.
///
/// [`Role::Presenter`] is never stored here; it is derived from
/// [`crate::SessionState::presenter`] so there is exactly one place that
/// decides who presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Connected, nothing registered yet
    Unassigned,
    /// Registered as a viewer (may send `follow-presenter`)
    Viewer,
    /// Registered as a remote only
    Remote,
    /// Holds presenter control
    Presenter,
}

/// Per-connection bookkeeping.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Connection identifier
    pub conn_id: ConnId,
    /// When the connection was registered
    pub connected_at: Instant,
    /// Registered role, never [`Role::Presenter`]
    pub role: Role,
    /// Protocol messages received so far
    pub messages_received: u64,
}

/// Live connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    sessions: HashMap<ConnId, SessionInfo>,
    max_connections: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry admitting at most `max_connections`.
    pub fn new(max_connections: usize) -> Self {
        Self { sessions: HashMap::new(), max_connections }
    }

    /// Register a newly connected endpoint.
    pub fn register(&mut self, conn_id: ConnId, now: Instant) -> Result<(), SessionError> {
        if self.sessions.contains_key(&conn_id) {
            return Err(SessionError::DuplicateConnection(conn_id));
        }
        if self.sessions.len() >= self.max_connections {
            return Err(SessionError::CapacityExceeded { max: self.max_connections });
        }

        self.sessions.insert(
            conn_id,
            SessionInfo { conn_id, connected_at: now, role: Role::Unassigned, messages_received: 0 },
        );
        Ok(())
    }

    /// Remove a connection. Returns `None` if it was already gone.
    pub fn unregister(&mut self, conn_id: ConnId) -> Option<SessionInfo> {
        self.sessions.remove(&conn_id)
    }

    /// Look up a connection.
    pub fn get(&self, conn_id: ConnId) -> Option<&SessionInfo> {
        self.sessions.get(&conn_id)
    }

    /// Whether a connection is registered.
    pub fn contains(&self, conn_id: ConnId) -> bool {
        self.sessions.contains_key(&conn_id)
    }

    /// Count an inbound message against a connection.
    pub fn record_message(&mut self, conn_id: ConnId) -> Result<(), SessionError> {
        let info =
            self.sessions.get_mut(&conn_id).ok_or(SessionError::UnknownConnection(conn_id))?;
        info.messages_received += 1;
        Ok(())
    }

    /// Mark a connection as a viewer. Viewer status is permanent for the
    /// connection's lifetime.
    pub fn mark_viewer(&mut self, conn_id: ConnId) {
        if let Some(info) = self.sessions.get_mut(&conn_id) {
            info.role = Role::Viewer;
        }
    }

    /// Mark a connection as a remote unless it is already a viewer.
    pub fn mark_remote(&mut self, conn_id: ConnId) {
        if let Some(info) = self.sessions.get_mut(&conn_id)
            && info.role == Role::Unassigned
        {
            info.role = Role::Remote;
        }
    }

    /// Whether the connection may send `follow-presenter`.
    pub fn is_viewer(&self, conn_id: ConnId) -> bool {
        self.sessions.get(&conn_id).is_some_and(|info| info.role == Role::Viewer)
    }

    /// Registered role, `None` if not connected.
    pub fn role(&self, conn_id: ConnId) -> Option<Role> {
        self.sessions.get(&conn_id).map(|info| info.role)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no connections are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Configured capacity.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}
