//! Datagram codec (C6) — a channel ID followed by a sequence of messages
//! (RFC 7574 §8.3, spec §4.1).
//!
//! A single PPSPP datagram carries one destination channel ID and as many
//! messages as fit; decoding consumes messages until the buffer is empty.

use crate::channel_id::{self, ChannelID};
use crate::error::CodecError;
use crate::message::{self, Message};

/// A decoded datagram: destination channel ID plus its messages, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub channel_id: ChannelID,
    pub messages: Vec<Message>,
}

/// Decodes a full datagram from `data`. All of `data` must belong to this
/// datagram — PPSPP datagrams are not length-prefixed and are expected to
/// arrive as one UDP payload (RFC 7574 §8.3).
pub fn decode(data: &[u8]) -> Result<Datagram, CodecError> {
    let (channel_id, mut rest) = channel_id::decode(data)?;
    let mut messages = Vec::new();
    while !rest.is_empty() {
        let (message, next_rest) = message::decode(rest)?;
        messages.push(message);
        rest = next_rest;
    }
    Ok(Datagram { channel_id, messages })
}

/// Encodes a full datagram.
pub fn encode(datagram: &Datagram) -> Vec<u8> {
    let mut out = channel_id::encode(&datagram.channel_id);
    for message in &datagram.messages {
        out.extend_from_slice(&message::encode(message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_type::MessageType;
    use crate::protocol_options::ProtocolOptions;

    #[test]
    fn round_trips_with_a_single_handshake_message() {
        let datagram = Datagram {
            channel_id: ChannelID::new(&[1, 2, 3, 4]).unwrap(),
            messages: vec![Message::Handshake {
                channel_id: ChannelID::new(&[5, 6, 7, 8]).unwrap(),
                options: ProtocolOptions::default(),
            }],
        };
        let encoded = encode(&datagram);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, datagram);
    }

    #[test]
    fn empty_datagram_after_channel_id_has_no_messages() {
        let datagram = Datagram {
            channel_id: ChannelID::ZERO,
            messages: vec![],
        };
        let encoded = encode(&datagram);
        assert_eq!(encoded.len(), 4);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, datagram);
    }

    #[test]
    fn short_datagram_fails_on_channel_id() {
        assert!(decode(&[1, 2]).is_err());
    }

    #[test]
    fn trailing_opaque_message_consumes_remainder() {
        let datagram = Datagram {
            channel_id: ChannelID::ZERO,
            messages: vec![Message::Opaque {
                message_type: MessageType::ACK,
                payload: vec![9, 9, 9],
            }],
        };
        let encoded = encode(&datagram);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, datagram);
    }
}
