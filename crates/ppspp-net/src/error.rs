//! Error taxonomy for the connection runtime (spec §6, kinds C7-C9 raise).

use crate::address::Address;
use std::net::AddrParseError;

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// `recv`/`send` was called on a connection that is closed or never connected.
    #[error("not connected")]
    NotConnected,

    /// Establishing a new endpoint took longer than the connector's configured timeout.
    #[error("connection timeout to {0}")]
    ConnectTimeout(Address),

    /// The underlying transport (socket bind, connect, I/O) failed.
    #[error("transport error for {address}: {source}")]
    TransportError {
        address: Address,
        #[source]
        source: std::io::Error,
    },

    /// Neither a local nor a remote address was given to `connect`/`listen`.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<AddrParseError> for NetError {
    fn from(err: AddrParseError) -> Self {
        NetError::InvalidAddress(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
