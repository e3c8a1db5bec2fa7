//! MessageType registry (C3) — the closed enumeration of PPSPP message kinds.
//!
//! See RFC 7574 §8.2. The declaration order here *is* the order used by the
//! Supported-Messages compressed bitmap (spec §4.3) — `MessageType::ALL` is
//! the `M` list referenced there, tag value 0 first.

use crate::error::CodecError;

/// One PPSPP message kind. Unknown tags are a decode error (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MessageType {
    HANDSHAKE = 0,
    DATA = 1,
    ACK = 2,
    HAVE = 3,
    INTEGRITY = 4,
    PEX_RESv4 = 5,
    PEX_REQ = 6,
    SIGNED_INTEGRITY = 7,
    REQUEST = 8,
    CANCEL = 9,
    CHOKE = 10,
    UNCHOKE = 11,
    PEX_RESv6 = 12,
    PEX_REScert = 13,
}

impl MessageType {
    /// All message types in ascending tag order — the `M` list of spec §4.3.
    pub const ALL: [MessageType; 14] = [
        MessageType::HANDSHAKE,
        MessageType::DATA,
        MessageType::ACK,
        MessageType::HAVE,
        MessageType::INTEGRITY,
        MessageType::PEX_RESv4,
        MessageType::PEX_REQ,
        MessageType::SIGNED_INTEGRITY,
        MessageType::REQUEST,
        MessageType::CANCEL,
        MessageType::CHOKE,
        MessageType::UNCHOKE,
        MessageType::PEX_RESv6,
        MessageType::PEX_REScert,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .ok_or(CodecError::UnknownMessageType(tag))
    }
}
