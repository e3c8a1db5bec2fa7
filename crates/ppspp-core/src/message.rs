//! Message codec (C5) — a pluggable registry mapping message-type tags to
//! their payload decoders/encoders (RFC 7574 §8).
//!
//! Only HANDSHAKE's payload is defined at this layer (channel ID plus
//! protocol options, spec §4.2): every other message type's payload is
//! opaque to this crate and carried as raw bytes, since their wire formats
//! depend on the swarm's negotiated chunk addressing method and are out of
//! scope here (spec Non-goals).

use crate::channel_id::{self, ChannelID};
use crate::error::CodecError;
use crate::message_type::MessageType;
use crate::primitives::{read_u8, write_u8};
use crate::protocol_options::{self, ProtocolOptions};

/// A decoded PPSPP message: a type tag plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// HANDSHAKE — carries the peer's channel ID and protocol options
    /// (RFC 7574 §8.3).
    Handshake {
        channel_id: ChannelID,
        options: ProtocolOptions,
    },
    /// Any message type this crate does not interpret. `payload` is
    /// whatever remained of the datagram when this message started; since
    /// message boundaries for these types aren't known at this layer, an
    /// opaque message always consumes the rest of the datagram.
    Opaque { message_type: MessageType, payload: Vec<u8> },
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Handshake { .. } => MessageType::HANDSHAKE,
            Message::Opaque { message_type, .. } => *message_type,
        }
    }
}

/// Decodes one message (tag byte plus payload) from the front of `data`.
pub fn decode(data: &[u8]) -> Result<(Message, &[u8]), CodecError> {
    let (tag, offset) = read_u8(data, 0)?;
    let message_type = MessageType::from_tag(tag).map_err(|err| {
        tracing::debug!(tag, "unrecognized message type tag");
        err
    })?;
    let rest = &data[offset..];

    match message_type {
        MessageType::HANDSHAKE => {
            let (channel_id, rest) = channel_id::decode(rest)?;
            let (options, rest) = protocol_options::decode(rest)?;
            Ok((Message::Handshake { channel_id, options }, rest))
        }
        other => Ok((
            Message::Opaque {
                message_type: other,
                payload: rest.to_vec(),
            },
            &[],
        )),
    }
}

/// Encodes one message (tag byte plus payload).
pub fn encode(message: &Message) -> Vec<u8> {
    let mut out = Vec::new();
    write_u8(&mut out, message.message_type().tag());
    match message {
        Message::Handshake { channel_id, options } => {
            out.extend_from_slice(&channel_id::encode(channel_id));
            out.extend_from_slice(&protocol_options::encode(options));
        }
        Message::Opaque { payload, .. } => out.extend_from_slice(payload),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn handshake_round_trips() {
        let message = Message::Handshake {
            channel_id: ChannelID::new(&[0x31, 0x32, 0x33, 0x34]).unwrap(),
            options: ProtocolOptions {
                version: Some(protocol_options::Version::Rfc7574),
                supported_messages: Some(BTreeSet::from([MessageType::HANDSHAKE])),
                ..Default::default()
            },
        };
        let encoded = encode(&message);
        let (decoded, rest) = decode(&encoded).unwrap();
        assert_eq!(decoded, message);
        assert!(rest.is_empty());
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert_eq!(decode(&[200]).unwrap_err(), CodecError::UnknownMessageType(200));
    }

    #[test]
    fn opaque_message_carries_remaining_bytes_as_payload() {
        let data = [MessageType::DATA.tag(), 1, 2, 3, 4];
        let (message, rest) = decode(&data).unwrap();
        assert_eq!(
            message,
            Message::Opaque {
                message_type: MessageType::DATA,
                payload: vec![1, 2, 3, 4],
            }
        );
        assert!(rest.is_empty());
    }
}
