//! Reference model for model-based testing.
//!
//! The model captures the role protocol as plainly as possible and serves as
//! the oracle against which the real engine is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod world;

pub use operation::{ClientId, Operation, OperationError, OperationResult};
pub use world::{ModelWorld, ObservableState};
