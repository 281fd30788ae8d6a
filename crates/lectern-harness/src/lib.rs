//! Deterministic simulation harness for Lectern protocol testing.
//!
//! Turmoil-based environment, server loop and participant for
//! deterministic, reproducible testing under various network conditions.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and the real engine,
//! and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod recording;
pub mod sim_client;
pub mod sim_env;
pub mod sim_server;

pub use model::{ClientId, ModelWorld, ObservableState, Operation, OperationError, OperationResult};
pub use recording::{Delivery, RecordingBroadcaster};
pub use sim_client::SimParticipant;
pub use sim_env::SimEnv;
pub use sim_server::{SIM_PORT, create_shared_driver, run_sim_server};
