//! Lectern protocol core logic
//!
//! Pure state machine logic for presenter/viewer slide synchronization,
//! completely decoupled from I/O.
//!
//! # Architecture
//!
//! The [`SessionEngine`] consumes one [`SessionEvent`] at a time (a
//! connection appearing, a decoded message, a connection disappearing),
//! applies it to the [`SessionState`] and [`ConnectionRegistry`] it owns, and
//! returns declarative [`SessionAction`]s. A runtime executes those actions
//! against a [`Broadcaster`]. Because the engine takes `&mut self` and never
//! suspends, each event is applied atomically; runtimes with real
//! parallelism serialize calls behind a single lock.
//!
//! # Components
//!
//! - [`engine`]: role protocol state machine
//! - [`session`]: presenter identity and slide position
//! - [`registry`]: live connections and their role tags
//! - [`secret`]: claim secret generation and caching
//! - [`broadcast`]: delivery abstraction and action dispatch
//! - [`mod@env`]: environment abstraction (time, RNG)
//! - [`error`]: bookkeeping errors

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod broadcast;
pub mod engine;
pub mod env;
pub mod error;
pub mod registry;
pub mod secret;
pub mod session;

pub use broadcast::{Broadcaster, dispatch};
pub use engine::{SessionAction, SessionConfig, SessionEngine, SessionEvent};
pub use env::Environment;
pub use error::SessionError;
pub use registry::{ConnId, ConnectionRegistry, Role, SessionInfo};
pub use secret::{ClaimSecret, DEFAULT_SECRET_LEN, SecretProvider};
pub use session::SessionState;

#[cfg(test)]
mod testing;
