//! Delivery abstraction.
//!
//! The engine never delivers anything itself. It returns
//! [`SessionAction`]s, and [`dispatch`] replays them against a
//! [`Broadcaster`] in the order they were emitted. Delivery is
//! fire-and-forget: there is no acknowledgement and no error path back into
//! the engine.

use lectern_proto::ServerMessage;

use crate::{engine::SessionAction, registry::ConnId};

/// Outbound message sink.
///
/// The broadcaster owns the set of reachable connections; it is the only
/// component that enumerates them.
pub trait Broadcaster {
    /// Deliver to one connection.
    fn send_to(&mut self, conn_id: ConnId, message: &ServerMessage);

    /// Deliver to every connection.
    fn send_to_all(&mut self, message: &ServerMessage);

    /// Deliver to every connection except `excluded`.
    fn send_to_all_except(&mut self, excluded: ConnId, message: &ServerMessage);
}

/// Execute actions in order.
pub fn dispatch<B>(actions: impl IntoIterator<Item = SessionAction>, broadcaster: &mut B)
where
    B: Broadcaster + ?Sized,
{
    for action in actions {
        match action {
            SessionAction::SendTo { conn_id, message } => broadcaster.send_to(conn_id, &message),
            SessionAction::SendToAll { message } => broadcaster.send_to_all(&message),
            SessionAction::SendToAllExcept { excluded, message } => {
                broadcaster.send_to_all_except(excluded, &message);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Broadcaster for Log {
        fn send_to(&mut self, conn_id: ConnId, message: &ServerMessage) {
            self.0.push(format!("to {conn_id}: {}", message.name()));
        }

        fn send_to_all(&mut self, message: &ServerMessage) {
            self.0.push(format!("all: {}", message.name()));
        }

        fn send_to_all_except(&mut self, excluded: ConnId, message: &ServerMessage) {
            self.0.push(format!("all but {excluded}: {}", message.name()));
        }
    }

    #[test]
    fn dispatch_preserves_emission_order() {
        let actions = vec![
            SessionAction::SendToAllExcept { excluded: 2, message: ServerMessage::mode_view(Some(3)) },
            SessionAction::SendTo { conn_id: 2, message: ServerMessage::mode_presenter(true) },
            SessionAction::SendToAll { message: ServerMessage::mode_presenter(false) },
        ];
        let mut log = Log::default();

        dispatch(actions, &mut log);

        assert_eq!(
            log.0,
            vec!["all but 2: mode-view", "to 2: mode-presenter", "all: mode-presenter"]
        );
    }
}
