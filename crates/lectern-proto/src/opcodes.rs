//! Opcode assignments.
//!
//! `0x01..=0x0F` are sent by participants, `0x10..=0x1F` by the server.
//! [`Opcode::Goto`] is shared: a presenter sends it and the server relays it
//! unchanged to everyone else.

use crate::errors::{ProtocolError, Result};

/// Frame opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Participant announces itself as a viewer.
    RegisterViewer = 0x01,
    /// Participant asks for a one-shot position snapshot.
    RegisterRemote = 0x02,
    /// Viewer asks to resume following the presenter.
    FollowPresenter = 0x03,
    /// Presenter gives up control.
    ReleasePresenter = 0x04,
    /// Participant asks for presenter control.
    ClaimPresenter = 0x05,
    /// Slide navigation.
    Goto = 0x06,
    /// Server tells a participant it may drive slides.
    ModePresenter = 0x10,
    /// Server tells a participant to mirror the presenter.
    ModeView = 0x11,
    /// Server answers a remote registration.
    InitRemote = 0x12,
}

impl Opcode {
    /// Parse an opcode byte.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::RegisterViewer),
            0x02 => Ok(Self::RegisterRemote),
            0x03 => Ok(Self::FollowPresenter),
            0x04 => Ok(Self::ReleasePresenter),
            0x05 => Ok(Self::ClaimPresenter),
            0x06 => Ok(Self::Goto),
            0x10 => Ok(Self::ModePresenter),
            0x11 => Ok(Self::ModeView),
            0x12 => Ok(Self::InitRemote),
            other => Err(ProtocolError::UnknownOpcode(other)),
        }
    }

    /// Raw opcode byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether participants may send this opcode.
    pub fn is_client_to_server(self) -> bool {
        matches!(
            self,
            Self::RegisterViewer
                | Self::RegisterRemote
                | Self::FollowPresenter
                | Self::ReleasePresenter
                | Self::ClaimPresenter
                | Self::Goto
        )
    }

    /// Whether the server may send this opcode.
    pub fn is_server_to_client(self) -> bool {
        matches!(self, Self::ModePresenter | Self::ModeView | Self::InitRemote | Self::Goto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_assigned_byte_parses_back() {
        for byte in 0..=u8::MAX {
            if let Ok(opcode) = Opcode::from_u8(byte) {
                assert_eq!(opcode.to_u8(), byte);
            }
        }
    }

    #[test]
    fn unassigned_byte_is_rejected() {
        assert_eq!(Opcode::from_u8(0x00), Err(ProtocolError::UnknownOpcode(0x00)));
        assert_eq!(Opcode::from_u8(0x7F), Err(ProtocolError::UnknownOpcode(0x7F)));
    }

    #[test]
    fn goto_flows_both_ways() {
        assert!(Opcode::Goto.is_client_to_server());
        assert!(Opcode::Goto.is_server_to_client());
        assert!(!Opcode::ClaimPresenter.is_server_to_client());
        assert!(!Opcode::InitRemote.is_client_to_server());
    }
}
