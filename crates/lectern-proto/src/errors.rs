//! Protocol error types.

use thiserror::Error;

use crate::opcodes::Opcode;

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer is shorter than the structure being read.
    #[error("frame too short: need {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Header magic does not match.
    #[error("invalid magic: {0:#010x}")]
    InvalidMagic(u32),

    /// Header version is not supported by this build.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// A reserved header field is not zero.
    #[error("reserved header bytes must be zero")]
    ReservedNotZero,

    /// Opcode byte is not assigned.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// Payload exceeds [`crate::MAX_PAYLOAD_SIZE`].
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Declared or actual payload size
        size: usize,
        /// Maximum permitted size
        max: usize,
    },

    /// Header length disagrees with the bytes that follow it.
    #[error("payload size mismatch: header declares {declared}, frame carries {actual}")]
    PayloadSizeMismatch {
        /// Size declared in the header
        declared: usize,
        /// Size actually present
        actual: usize,
    },

    /// Opcode is valid but not accepted in this direction.
    #[error("unexpected opcode {0:?} for this direction")]
    UnexpectedOpcode(Opcode),

    /// CBOR serialization failed.
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// CBOR deserialization failed.
    #[error("CBOR decode error: {0}")]
    CborDecode(String),
}
