//! Channel ID (C2) — a 4-byte identifier a peer assigns to a logical channel.
//!
//! Source and destination channel IDs prefix every PPSPP datagram
//! (RFC 7574 §1.3, §12.1).

use crate::error::CodecError;
use crate::primitives::{read_fixed, write_fixed};
use std::fmt;

const CHANNEL_ID_LEN: usize = 4;

/// Opaque 4-byte channel identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelID([u8; CHANNEL_ID_LEN]);

impl ChannelID {
    /// The all-zero channel ID, used during handshake initiation and explicit
    /// teardown (RFC 7574 §8.4).
    pub const ZERO: ChannelID = ChannelID([0u8; CHANNEL_ID_LEN]);

    /// Builds a channel ID from exactly 4 bytes. Fails if `bytes.len() != 4`.
    pub fn new(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != CHANNEL_ID_LEN {
            return Err(CodecError::ShortRead {
                needed: CHANNEL_ID_LEN,
                available: bytes.len(),
            });
        }
        let mut id = [0u8; CHANNEL_ID_LEN];
        id.copy_from_slice(bytes);
        Ok(ChannelID(id))
    }

    /// Draws 4 cryptographic-quality random bytes for a fresh channel ID.
    pub fn new_random() -> Self {
        use rand::RngCore;
        let mut id = [0u8; CHANNEL_ID_LEN];
        rand::thread_rng().fill_bytes(&mut id);
        ChannelID(id)
    }

    pub fn as_bytes(&self) -> &[u8; CHANNEL_ID_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == ChannelID::ZERO
    }
}

/// Decodes a channel ID from the front of `data`, returning it and the rest.
pub fn decode(data: &[u8]) -> Result<(ChannelID, &[u8]), CodecError> {
    let (bytes, offset) = read_fixed(data, 0, CHANNEL_ID_LEN)?;
    Ok((ChannelID::new(bytes)?, &data[offset..]))
}

/// Encodes a channel ID into its 4-byte wire form.
pub fn encode(id: &ChannelID) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHANNEL_ID_LEN);
    write_fixed(&mut out, &id.0);
    out
}

impl fmt::Debug for ChannelID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelID({})", hex::encode(self.0))
    }
}

impl fmt::Display for ChannelID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
