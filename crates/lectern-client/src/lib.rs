//! Lectern client state machine.
//!
//! Tracks what a single participant is doing (viewing, presenting, acting as
//! a remote) and turns user intent and server messages into actions. No I/O:
//! the caller sends the [`ClientAction::Send`] messages and renders
//! [`ClientAction::ShowSlide`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod event;

pub use client::{Client, ClientConfig};
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent, ClientMode};
