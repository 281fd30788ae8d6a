//! Fuzz target for frame and message decoding
//!
//! # Invariants
//!
//! - Arbitrary bytes never panic the decoder
//! - A decoded frame's payload never exceeds the size limit
//! - Any message that decodes re-encodes to a frame that decodes to the same
//!   message

#![no_main]

use libfuzzer_sys::fuzz_target;
use lectern_proto::{ClientMessage, Frame, ServerMessage, MAX_PAYLOAD_SIZE};

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = Frame::decode(data) else {
        return;
    };
    assert!(frame.payload.len() <= MAX_PAYLOAD_SIZE);

    if let Ok(message) = ClientMessage::from_frame(&frame) {
        let again = message.to_frame().expect("decoded message must re-encode");
        assert_eq!(ClientMessage::from_frame(&again).ok(), Some(message));
    }

    if let Ok(message) = ServerMessage::from_frame(&frame) {
        let again = message.to_frame().expect("decoded message must re-encode");
        assert_eq!(ServerMessage::from_frame(&again).ok(), Some(message));
    }
});
