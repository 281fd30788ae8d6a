//! Payload types carried in frame bodies.
//!
//! Field names are serialized in camelCase (`totalSlides`) to match the
//! message vocabulary browser clients already speak.

pub mod control;
pub mod navigation;

pub use control::{ClaimPresenter, InitRemote, ModePresenter, ModeView, RegisterViewer};
pub use navigation::Goto;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{ProtocolError, Result};

/// Serialize a payload to CBOR.
pub fn encode_payload<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).map_err(|e| ProtocolError::CborEncode(e.to_string()))?;
    Ok(out)
}

/// Deserialize a payload from CBOR.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}
