//! Wire format for the Lectern protocol.
//!
//! Frames consist of a fixed 16-byte header (zero-copy binary) followed by a
//! variable-length CBOR payload. The header carries the opcode and payload
//! length so the server can route and bound a frame before touching the
//! payload.
//!
//! # Messages
//!
//! - [`ClientMessage`]: everything a participant may send (register, claim,
//!   navigate, release)
//! - [`ServerMessage`]: everything the session engine emits (mode changes,
//!   remote snapshots, navigation)
//!
//! # Security
//!
//! All header parsing uses compile-time verified layouts via `zerocopy`.
//! Payloads are capped at [`MAX_PAYLOAD_SIZE`] bytes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod frame;
pub mod header;
pub mod messages;
pub mod opcodes;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use header::{FrameHeader, MAX_PAYLOAD_SIZE};
pub use messages::{ClientMessage, ServerMessage};
pub use opcodes::Opcode;
pub use payloads::{ClaimPresenter, Goto, InitRemote, ModePresenter, ModeView, RegisterViewer};
