//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! engine behaves identically to the reference model.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelWorld    RealWorld      Compare
//!      (reference)   (engine)       Observable state
//! ```

use lectern_core::{
    ClaimSecret, ConnId, SessionConfig, SessionEngine, SessionError, SessionEvent, dispatch,
};
use lectern_harness::{
    ClientId, ModelWorld, ObservableState, Operation, OperationError, OperationResult,
    RecordingBroadcaster, SimEnv,
};
use lectern_proto::{ClaimPresenter, ClientMessage, Goto, RegisterViewer};
use proptest::prelude::*;

const SECRET: &str = "c0de";

/// Real system wrapper that mirrors ModelWorld's interface.
struct RealWorld {
    engine: SessionEngine<SimEnv>,
    broadcaster: RecordingBroadcaster,
    num_clients: usize,
}

impl RealWorld {
    fn new(num_clients: usize, seed: u64) -> Self {
        let env = SimEnv::with_seed(seed);
        let engine = SessionEngine::new(env, &SessionConfig::default(), ClaimSecret::new(SECRET));
        Self { engine, broadcaster: RecordingBroadcaster::new(), num_clients }
    }

    fn conn(client_id: ClientId) -> ConnId {
        ConnId::from(client_id) + 1
    }

    fn apply(&mut self, op: &Operation) -> OperationResult {
        let client_id = op.client_id();
        if client_id as usize >= self.num_clients {
            return OperationResult::Error(OperationError::InvalidClient);
        }
        let conn_id = Self::conn(client_id);

        let result = match op {
            Operation::Connect { .. } => {
                let result = self.engine.process_event(SessionEvent::Connected { conn_id });
                if result.is_ok() {
                    self.broadcaster.connect(conn_id);
                }
                result
            },
            Operation::Disconnect { .. } => {
                self.broadcaster.disconnect(conn_id);
                self.engine.process_event(SessionEvent::Disconnected { conn_id })
            },
            _ => {
                let message = Self::message(op);
                self.engine.process_event(SessionEvent::Message { conn_id, message })
            },
        };

        match result {
            Ok(actions) => {
                dispatch(actions, &mut self.broadcaster);
                OperationResult::Ok
            },
            Err(SessionError::DuplicateConnection(_)) => {
                OperationResult::Error(OperationError::AlreadyConnected)
            },
            Err(_) => OperationResult::Error(OperationError::NotConnected),
        }
    }

    fn message(op: &Operation) -> ClientMessage {
        match *op {
            Operation::RegisterViewer { total_slides, .. } => {
                ClientMessage::RegisterViewer(RegisterViewer { total_slides: total_slides.into() })
            },
            Operation::FollowPresenter { .. } => ClientMessage::FollowPresenter,
            Operation::ReleasePresenter { .. } => ClientMessage::ReleasePresenter,
            Operation::ClaimPresenter { correct_pass, slide, .. } => {
                let pass = if correct_pass { SECRET } else { "guess" };
                ClientMessage::ClaimPresenter(ClaimPresenter {
                    pass: pass.to_string(),
                    slide: slide.into(),
                })
            },
            Operation::Goto { slide, .. } => ClientMessage::Goto(Goto { slide: slide.into() }),
            Operation::RegisterRemote { .. }
            | Operation::Connect { .. }
            | Operation::Disconnect { .. } => ClientMessage::RegisterRemote,
        }
    }

    fn observable_state(&self) -> ObservableState {
        let state = self.engine.state();
        let clients = 0..self.num_clients as ClientId;
        ObservableState {
            presenter: state.presenter().and_then(|c| ClientId::try_from(c - 1).ok()),
            current_slide: state.current_slide(),
            total_slides: state.total_slides(),
            roles: clients.clone().map(|c| self.engine.role_of(Self::conn(c))).collect(),
            inboxes: clients.map(|c| self.broadcaster.inbox(Self::conn(c)).to_vec()).collect(),
        }
    }
}

/// Strategy for generating operations with valid client IDs.
fn operation_strategy(num_clients: u8) -> impl Strategy<Value = Operation> {
    let client_id = 0..num_clients;
    let slide = 0..12u8;

    prop_oneof![
        3 => client_id.clone().prop_map(|c| Operation::Connect { client_id: c }),
        1 => client_id.clone().prop_map(|c| Operation::Disconnect { client_id: c }),
        2 => (client_id.clone(), 1..40u8).prop_map(|(c, t)| Operation::RegisterViewer {
            client_id: c,
            total_slides: t
        }),
        1 => client_id.clone().prop_map(|c| Operation::RegisterRemote { client_id: c }),
        1 => client_id.clone().prop_map(|c| Operation::FollowPresenter { client_id: c }),
        1 => client_id.clone().prop_map(|c| Operation::ReleasePresenter { client_id: c }),
        3 => (client_id.clone(), any::<bool>(), slide.clone()).prop_map(|(c, ok, s)| {
            Operation::ClaimPresenter { client_id: c, correct_pass: ok, slide: s }
        }),
        3 => (client_id, slide).prop_map(|(c, s)| Operation::Goto { client_id: c, slide: s }),
    ]
}

proptest! {
    /// Results and observable state match after every step.
    #[test]
    fn prop_model_matches_real(
        seed in any::<u64>(),
        ops in prop::collection::vec(operation_strategy(4), 0..80)
    ) {
        let mut model = ModelWorld::new(4);
        let mut real = RealWorld::new(4, seed);

        for (i, op) in ops.iter().enumerate() {
            let model_result = model.apply(op);
            let real_result = real.apply(op);

            prop_assert_eq!(
                model_result,
                real_result,
                "Divergence at operation {}: {:?}",
                i, op
            );
            prop_assert_eq!(
                model.observable_state(),
                real.observable_state(),
                "State divergence after operation {}: {:?}",
                i, op
            );
        }
    }

    /// A wrong secret never moves presenter or slide.
    #[test]
    fn prop_wrong_secret_is_inert(
        ops in prop::collection::vec(operation_strategy(3), 0..40),
        claimant in 0..3u8,
        slide in 0..12u8,
    ) {
        let mut real = RealWorld::new(3, 1);
        for op in &ops {
            let _ = real.apply(op);
        }
        let before = real.observable_state();

        let _ = real.apply(&Operation::ClaimPresenter {
            client_id: claimant,
            correct_pass: false,
            slide,
        });
        let after = real.observable_state();

        prop_assert_eq!(before.presenter, after.presenter);
        prop_assert_eq!(before.current_slide, after.current_slide);
        prop_assert_eq!(before.inboxes, after.inboxes);
    }

    /// At most one participant is ever in the presenter role.
    #[test]
    fn prop_single_presenter(
        ops in prop::collection::vec(operation_strategy(5), 0..120)
    ) {
        let mut real = RealWorld::new(5, 2);
        for op in &ops {
            let _ = real.apply(op);
            let presenters = real
                .observable_state()
                .roles
                .iter()
                .filter(|r| **r == Some(lectern_core::Role::Presenter))
                .count();
            prop_assert!(presenters <= 1);
        }
    }
}

#[cfg(test)]
mod smoke_tests {
    use lectern_proto::{InitRemote, ServerMessage};

    use super::*;

    #[test]
    fn remote_snapshot_matches_between_model_and_real() {
        let ops = [
            Operation::Connect { client_id: 0 },
            Operation::Connect { client_id: 1 },
            Operation::RegisterViewer { client_id: 0, total_slides: 10 },
            Operation::ClaimPresenter { client_id: 1, correct_pass: true, slide: 3 },
            Operation::Connect { client_id: 2 },
            Operation::RegisterRemote { client_id: 2 },
        ];
        let mut model = ModelWorld::new(3);
        let mut real = RealWorld::new(3, 0);
        for op in &ops {
            assert_eq!(model.apply(op), real.apply(op));
        }

        let state = real.observable_state();
        assert_eq!(state, model.observable_state());
        assert_eq!(
            state.inboxes[2],
            vec![ServerMessage::InitRemote(InitRemote { slide: 3, total_slides: 10 })]
        );
    }

    #[test]
    fn reconnect_forgets_viewer_registration() {
        let mut real = RealWorld::new(1, 0);
        real.apply(&Operation::Connect { client_id: 0 });
        real.apply(&Operation::RegisterViewer { client_id: 0, total_slides: 4 });
        real.apply(&Operation::Disconnect { client_id: 0 });
        real.apply(&Operation::Connect { client_id: 0 });
        real.apply(&Operation::FollowPresenter { client_id: 0 });

        assert_eq!(real.observable_state().inboxes[0], vec![ServerMessage::mode_presenter(false)]);
    }
}
