//! Bit-exact wire codec for the PPSPP datagram, message, and handshake
//! protocol-options formats (RFC 7574).
//!
//! This crate is pure codec: no I/O, no async, no sockets. It turns bytes
//! into typed records and back, and nothing else. Connection and transport
//! semantics live in the companion `ppspp-net` crate.
//!
//! Layering, bottom to top:
//! - [`primitives`] — fixed-width big-endian integers and length-prefixed blobs
//! - [`channel_id`] — the 4-byte channel identifier
//! - [`message_type`] — the closed registry of message-type tags
//! - [`protocol_options`] — the handshake's ordered, cross-referential option record
//! - [`message`] — message-type dispatch (HANDSHAKE payload, opaque passthrough)
//! - [`datagram`] — channel ID plus a sequence of messages

pub mod channel_id;
pub mod datagram;
pub mod error;
pub mod message;
pub mod message_type;
pub mod primitives;
pub mod protocol_options;

pub use channel_id::ChannelID;
pub use datagram::Datagram;
pub use error::{CodecError, Result};
pub use message::Message;
pub use message_type::MessageType;
pub use protocol_options::{
    ChunkAddressingMethod, ContentIntegrityProtectionMethod, LiveSignatureAlgorithm,
    MerkleHashTreeFunction, ProtocolOptions, Version, CAM, CIPM, LSA, MHTF,
};
