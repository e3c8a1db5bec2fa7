//! PPSPP (RFC 7574): wire codec and connection runtime.
//!
//! This crate re-exports [`ppspp_core`] (datagram/message/protocol-options
//! codec, no I/O) and [`ppspp_net`] (endpoints, connector, UDP transport)
//! behind one name, for applications that want both without depending on
//! each crate separately.

pub use ppspp_core as core;
pub use ppspp_net as net;

pub use ppspp_core::{
    ChannelID, ChunkAddressingMethod, CodecError, ContentIntegrityProtectionMethod, Datagram,
    LiveSignatureAlgorithm, MerkleHashTreeFunction, Message, MessageType, ProtocolOptions, Version,
};
pub use ppspp_net::{Address, Connection, Connector, ConnectorConfig, Endpoint, NetError, UdpTransport};
