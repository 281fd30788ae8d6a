//! Fuzz target for [`SessionEngine`]
//!
//! Hunt for sequences that hand presenter control to the wrong connection.
//!
//! # Strategy
//!
//! - Event sequences: connects, disconnects and every inbound message, from
//!   a small pool of connection ids so collisions are common
//! - Claims carry either the real secret or arbitrary bytes
//!
//! # Invariants
//!
//! - At most one presenter, and it is a live connection
//! - Presenter only ever changes through a claim with the real secret, a
//!   release, or the presenter's disconnect
//! - A wrong-secret claim emits nothing
//! - `goto` from a non-presenter emits nothing and keeps the slide
//! - NEVER panic

#![no_main]

use std::time::Instant;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lectern_core::{
    ClaimSecret, Environment, SessionConfig, SessionEngine, SessionEvent,
};
use lectern_proto::{ClaimPresenter, ClientMessage, Goto, RegisterViewer};

const SECRET: &str = "f00d";

#[derive(Clone)]
struct FuzzEnv;

impl Environment for FuzzEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0);
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzEvent {
    Connect(u8),
    Disconnect(u8),
    RegisterViewer(u8, u32),
    RegisterRemote(u8),
    FollowPresenter(u8),
    ReleasePresenter(u8),
    Claim { conn: u8, correct: bool, guess: String, slide: u32 },
    Goto(u8, u32),
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    max_connections: u8,
    events: Vec<FuzzEvent>,
}

fuzz_target!(|input: FuzzInput| {
    let config = SessionConfig { max_connections: usize::from(input.max_connections.max(1)) };
    let mut engine = SessionEngine::new(FuzzEnv, &config, ClaimSecret::new(SECRET));

    for event in input.events {
        let before = engine.state().presenter();
        let slide_before = engine.state().current_slide();

        let (session_event, kind) = match event {
            FuzzEvent::Connect(c) => (SessionEvent::Connected { conn_id: conn(c) }, Kind::Other),
            FuzzEvent::Disconnect(c) => {
                (SessionEvent::Disconnected { conn_id: conn(c) }, Kind::Disconnect(conn(c)))
            },
            FuzzEvent::RegisterViewer(c, total_slides) => (
                message(c, ClientMessage::RegisterViewer(RegisterViewer { total_slides })),
                Kind::Other,
            ),
            FuzzEvent::RegisterRemote(c) => (message(c, ClientMessage::RegisterRemote), Kind::Other),
            FuzzEvent::FollowPresenter(c) => {
                (message(c, ClientMessage::FollowPresenter), Kind::Other)
            },
            FuzzEvent::ReleasePresenter(c) => {
                (message(c, ClientMessage::ReleasePresenter), Kind::Release(conn(c)))
            },
            FuzzEvent::Claim { conn: c, correct, guess, slide } => {
                let pass = if correct { SECRET.to_string() } else { guess };
                let authentic = pass == SECRET;
                (
                    message(c, ClientMessage::ClaimPresenter(ClaimPresenter { pass, slide })),
                    Kind::Claim { conn: conn(c), authentic },
                )
            },
            FuzzEvent::Goto(c, slide) => {
                (message(c, ClientMessage::Goto(Goto { slide })), Kind::Goto(conn(c)))
            },
        };

        let Ok(actions) = engine.process_event(session_event) else {
            assert_eq!(engine.state().presenter(), before, "rejected event changed presenter");
            continue;
        };
        let after = engine.state().presenter();

        if let Some(p) = after {
            assert!(engine.registry().contains(p), "presenter {p} is not connected");
        }

        match kind {
            Kind::Claim { conn, authentic: false } => {
                assert_eq!(after, before, "wrong secret changed presenter");
                assert!(actions.is_empty(), "wrong secret emitted {actions:?} for {conn}");
            },
            Kind::Claim { conn, authentic: true } => {
                if engine.registry().contains(conn) {
                    assert_eq!(after, Some(conn));
                }
            },
            Kind::Release(conn) => {
                if before == Some(conn) {
                    assert_eq!(after, None);
                } else {
                    assert_eq!(after, before);
                }
            },
            Kind::Disconnect(conn) => {
                if before == Some(conn) {
                    assert_eq!(after, None);
                    assert_eq!(engine.state().current_slide(), None);
                } else {
                    assert_eq!(after, before);
                }
            },
            Kind::Goto(conn) => {
                assert_eq!(after, before);
                if before != Some(conn) {
                    assert!(actions.is_empty());
                    assert_eq!(engine.state().current_slide(), slide_before);
                }
            },
            Kind::Other => assert_eq!(after, before),
        }
    }
});

enum Kind {
    Claim { conn: u64, authentic: bool },
    Release(u64),
    Disconnect(u64),
    Goto(u64),
    Other,
}

fn conn(c: u8) -> u64 {
    u64::from(c % 8)
}

fn message(c: u8, message: ClientMessage) -> SessionEvent {
    SessionEvent::Message { conn_id: conn(c), message }
}
