//! Typed messages and their frame encodings.
//!
//! Participants only ever send [`ClientMessage`]s and the server only ever
//! sends [`ServerMessage`]s. Decoding a frame in the wrong direction fails
//! with [`ProtocolError::UnexpectedOpcode`].

use bytes::Bytes;

use crate::{
    errors::{ProtocolError, Result},
    frame::Frame,
    opcodes::Opcode,
    payloads::{
        ClaimPresenter, Goto, InitRemote, ModePresenter, ModeView, RegisterViewer, decode_payload,
        encode_payload,
    },
};

/// Messages sent by participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `register-viewer{totalSlides}`
    RegisterViewer(RegisterViewer),
    /// `register-remote{}`
    RegisterRemote,
    /// `follow-presenter{}`
    FollowPresenter,
    /// `release-presenter{}`
    ReleasePresenter,
    /// `claim-presenter{pass, slide}`
    ClaimPresenter(ClaimPresenter),
    /// `goto{slide}`
    Goto(Goto),
}

/// Messages sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    /// `mode-presenter{broadcast}`
    ModePresenter(ModePresenter),
    /// `mode-view{slide}`
    ModeView(ModeView),
    /// `init-remote{slide, totalSlides}`
    InitRemote(InitRemote),
    /// `goto{slide}`
    Goto(Goto),
}

impl ClientMessage {
    /// Opcode used on the wire.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::RegisterViewer(_) => Opcode::RegisterViewer,
            Self::RegisterRemote => Opcode::RegisterRemote,
            Self::FollowPresenter => Opcode::FollowPresenter,
            Self::ReleasePresenter => Opcode::ReleasePresenter,
            Self::ClaimPresenter(_) => Opcode::ClaimPresenter,
            Self::Goto(_) => Opcode::Goto,
        }
    }

    /// Short protocol name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterViewer(_) => "register-viewer",
            Self::RegisterRemote => "register-remote",
            Self::FollowPresenter => "follow-presenter",
            Self::ReleasePresenter => "release-presenter",
            Self::ClaimPresenter(_) => "claim-presenter",
            Self::Goto(_) => "goto",
        }
    }

    /// Encode into a frame.
    pub fn to_frame(&self) -> Result<Frame> {
        let payload = match self {
            Self::RegisterViewer(p) => encode_payload(p)?,
            Self::ClaimPresenter(p) => encode_payload(p)?,
            Self::Goto(p) => encode_payload(p)?,
            Self::RegisterRemote | Self::FollowPresenter | Self::ReleasePresenter => Vec::new(),
        };
        Ok(Frame::new(self.opcode(), payload))
    }

    /// Decode from a frame.
    ///
    /// Payloadless messages ignore whatever body they carry.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let opcode = frame.opcode()?;
        let body = &frame.payload;
        match opcode {
            Opcode::RegisterViewer => Ok(Self::RegisterViewer(decode_payload(body)?)),
            Opcode::RegisterRemote => Ok(Self::RegisterRemote),
            Opcode::FollowPresenter => Ok(Self::FollowPresenter),
            Opcode::ReleasePresenter => Ok(Self::ReleasePresenter),
            Opcode::ClaimPresenter => Ok(Self::ClaimPresenter(decode_payload(body)?)),
            Opcode::Goto => Ok(Self::Goto(decode_payload(body)?)),
            Opcode::ModePresenter | Opcode::ModeView | Opcode::InitRemote => {
                Err(ProtocolError::UnexpectedOpcode(opcode))
            },
        }
    }
}

impl ServerMessage {
    /// Opcode used on the wire.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::ModePresenter(_) => Opcode::ModePresenter,
            Self::ModeView(_) => Opcode::ModeView,
            Self::InitRemote(_) => Opcode::InitRemote,
            Self::Goto(_) => Opcode::Goto,
        }
    }

    /// Short protocol name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModePresenter(_) => "mode-presenter",
            Self::ModeView(_) => "mode-view",
            Self::InitRemote(_) => "init-remote",
            Self::Goto(_) => "goto",
        }
    }

    /// `mode-presenter{broadcast}`
    pub fn mode_presenter(broadcast: bool) -> Self {
        Self::ModePresenter(ModePresenter { broadcast })
    }

    /// `mode-view{slide}`
    pub fn mode_view(slide: Option<u32>) -> Self {
        Self::ModeView(ModeView { slide })
    }

    /// `goto{slide}`
    pub fn goto(slide: u32) -> Self {
        Self::Goto(Goto { slide })
    }

    /// Encode into a frame.
    pub fn to_frame(&self) -> Result<Frame> {
        let payload = match self {
            Self::ModePresenter(p) => encode_payload(p)?,
            Self::ModeView(p) => encode_payload(p)?,
            Self::InitRemote(p) => encode_payload(p)?,
            Self::Goto(p) => encode_payload(p)?,
        };
        Ok(Frame::new(self.opcode(), Bytes::from(payload)))
    }

    /// Decode from a frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let opcode = frame.opcode()?;
        let body = &frame.payload;
        match opcode {
            Opcode::ModePresenter => Ok(Self::ModePresenter(decode_payload(body)?)),
            Opcode::ModeView => Ok(Self::ModeView(decode_payload(body)?)),
            Opcode::InitRemote => Ok(Self::InitRemote(decode_payload(body)?)),
            Opcode::Goto => Ok(Self::Goto(decode_payload(body)?)),
            Opcode::RegisterViewer
            | Opcode::RegisterRemote
            | Opcode::FollowPresenter
            | Opcode::ReleasePresenter
            | Opcode::ClaimPresenter => Err(ProtocolError::UnexpectedOpcode(opcode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn claim_survives_the_wire() {
        let msg = ClientMessage::ClaimPresenter(ClaimPresenter { pass: "ab12".into(), slide: 3 });
        let mut buf = Vec::new();
        msg.to_frame().unwrap().encode(&mut buf).unwrap();

        let frame = Frame::decode(&buf).unwrap();
        assert_eq!(ClientMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn payloadless_messages_have_empty_bodies() {
        for msg in [
            ClientMessage::RegisterRemote,
            ClientMessage::FollowPresenter,
            ClientMessage::ReleasePresenter,
        ] {
            let frame = msg.to_frame().unwrap();
            assert!(frame.payload.is_empty(), "{} carried a body", msg.name());
        }
    }

    #[test]
    fn server_opcode_rejected_from_client() {
        let frame = ServerMessage::mode_presenter(true).to_frame().unwrap();
        assert_eq!(
            ClientMessage::from_frame(&frame),
            Err(ProtocolError::UnexpectedOpcode(Opcode::ModePresenter))
        );
    }

    #[test]
    fn client_opcode_rejected_from_server() {
        let frame = ClientMessage::ReleasePresenter.to_frame().unwrap();
        assert_eq!(
            ServerMessage::from_frame(&frame),
            Err(ProtocolError::UnexpectedOpcode(Opcode::ReleasePresenter))
        );
    }

    #[test]
    fn goto_relays_between_directions() {
        let inbound = ClientMessage::Goto(Goto { slide: 9 }).to_frame().unwrap();
        assert_eq!(ServerMessage::from_frame(&inbound).unwrap(), ServerMessage::goto(9));
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let frame = Frame::new(Opcode::ClaimPresenter, vec![0xFF, 0x00, 0x13]);
        assert!(matches!(ClientMessage::from_frame(&frame), Err(ProtocolError::CborDecode(_))));
    }

    proptest! {
        #[test]
        fn init_remote_encodes_any_snapshot(slide: u32, total_slides: u32) {
            let msg = ServerMessage::InitRemote(InitRemote { slide, total_slides });
            let frame = msg.to_frame().unwrap();
            prop_assert_eq!(ServerMessage::from_frame(&frame).unwrap(), msg);
        }
    }
}
