//! Fixed-size frame header.
//!
//! ```text
//! 0       4   5   6       8           12          16
//! +-------+---+---+-------+-----------+-----------+
//! | magic |ver|op | rsvd  | pay. size |   rsvd    |
//! +-------+---+---+-------+-----------+-----------+
//! ```
//!
//! All multi-byte fields are big-endian.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U16, U32},
};

use crate::{
    errors::{ProtocolError, Result},
    opcodes::Opcode,
};

/// Maximum payload size accepted on the wire (64 KiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Frame header, laid out exactly as it appears on the wire.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct FrameHeader {
    magic: U32<BigEndian>,
    version: u8,
    opcode: u8,
    reserved: U16<BigEndian>,
    payload_size: U32<BigEndian>,
    reserved_tail: U32<BigEndian>,
}

impl FrameHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 16;

    /// "LCTN"
    pub const MAGIC: u32 = 0x4C43_544E;

    /// Current protocol version.
    pub const VERSION: u8 = 1;

    /// Create a header for the given opcode with an empty payload.
    pub fn new(opcode: Opcode) -> Self {
        Self {
            magic: U32::new(Self::MAGIC),
            version: Self::VERSION,
            opcode: opcode.to_u8(),
            reserved: U16::new(0),
            payload_size: U32::new(0),
            reserved_tail: U32::new(0),
        }
    }

    /// Parse and validate a header from the first [`Self::SIZE`] bytes.
    ///
    /// Rejects bad magic, unknown versions, unassigned opcodes, non-zero
    /// reserved fields and payload sizes above [`MAX_PAYLOAD_SIZE`]. Everything after the header is
    /// ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(head) = bytes.get(..Self::SIZE) else {
            return Err(ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() });
        };
        let header = Self::read_from_bytes(head).map_err(|_| ProtocolError::FrameTooShort {
            expected: Self::SIZE,
            actual: bytes.len(),
        })?;

        if header.magic.get() != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic(header.magic.get()));
        }
        if header.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(header.version));
        }
        Opcode::from_u8(header.opcode)?;
        if header.reserved.get() != 0 || header.reserved_tail.get() != 0 {
            return Err(ProtocolError::ReservedNotZero);
        }

        let size = header.payload_size();
        if size > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge { size, max: MAX_PAYLOAD_SIZE });
        }

        Ok(header)
    }

    /// Raw header bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    /// Raw opcode byte.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Parsed opcode, `None` if unassigned.
    pub fn opcode_enum(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode).ok()
    }

    /// Declared payload length.
    pub fn payload_size(&self) -> usize {
        self.payload_size.get() as usize
    }

    /// Set the declared payload length.
    pub fn set_payload_size(&mut self, size: u32) {
        self.payload_size = U32::new(size);
    }
}

impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("version", &self.version)
            .field("opcode", &self.opcode_enum())
            .field("payload_size", &self.payload_size())
            .finish_non_exhaustive()
    }
}
