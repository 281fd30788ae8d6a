//! Complete frames: header plus payload.

use bytes::Bytes;

use crate::{
    errors::{ProtocolError, Result},
    header::{FrameHeader, MAX_PAYLOAD_SIZE},
    opcodes::Opcode,
};

/// A header and the payload it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Fixed header
    pub header: FrameHeader,
    /// CBOR payload (possibly empty)
    pub payload: Bytes,
}

impl Frame {
    /// Build a frame, filling in the payload size.
    ///
    /// Oversized payloads are caught by [`Frame::encode`].
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let mut header = FrameHeader::new(opcode);
        header.set_payload_size(u32::try_from(payload.len()).unwrap_or(u32::MAX));
        Self { header, payload }
    }

    /// Parsed opcode.
    pub fn opcode(&self) -> Result<Opcode> {
        Opcode::from_u8(self.header.opcode())
    }

    /// Total encoded size.
    pub fn encoded_len(&self) -> usize {
        FrameHeader::SIZE + self.payload.len()
    }

    /// Append the encoded frame to `dst`.
    pub fn encode(&self, dst: &mut Vec<u8>) -> Result<()> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        if self.header.payload_size() != self.payload.len() {
            return Err(ProtocolError::PayloadSizeMismatch {
                declared: self.header.payload_size(),
                actual: self.payload.len(),
            });
        }

        dst.reserve(self.encoded_len());
        dst.extend_from_slice(&self.header.to_bytes());
        dst.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Decode exactly one frame from `buf`.
    ///
    /// Trailing bytes beyond the declared payload are an error.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let header = FrameHeader::from_bytes(buf)?;
        let body = &buf[FrameHeader::SIZE..];
        let declared = header.payload_size();

        if body.len() != declared {
            return Err(ProtocolError::PayloadSizeMismatch { declared, actual: body.len() });
        }

        Ok(Self { header, payload: Bytes::copy_from_slice(body) })
    }

    /// Attach a payload to an already validated header.
    ///
    /// Used by stream readers that read the header and the payload
    /// separately.
    pub fn from_parts(header: FrameHeader, payload: Bytes) -> Result<Self> {
        if header.payload_size() != payload.len() {
            return Err(ProtocolError::PayloadSizeMismatch {
                declared: header.payload_size(),
                actual: payload.len(),
            });
        }
        Ok(Self { header, payload })
    }
}
