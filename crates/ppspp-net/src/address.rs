//! Peer addresses (C9) — an IP address and port pair, validated up front so
//! every downstream consumer can treat it as opaque (spec §5 / original
//! source's `Address` namedtuple).

use crate::error::NetError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A validated `(ip, port)` pair identifying a peer endpoint.
///
/// Canonicalization is whatever `std::net::IpAddr`'s `Display` produces;
/// this crate makes no promises about round-tripping a non-canonical
/// textual IPv6 address back to the same string (spec Open Question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    ip: IpAddr,
    port: u16,
}

impl Address {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Address { ip, port }
    }

    /// Parses `"host:port"`, where `host` is a literal IPv4 or IPv6 address
    /// (bracketed, in the IPv6 case).
    pub fn parse(text: &str) -> Result<Self, NetError> {
        let socket_addr: SocketAddr = text
            .parse()
            .map_err(|_| NetError::InvalidAddress(text.to_string()))?;
        Ok(Address::from(socket_addr))
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl From<SocketAddr> for Address {
    fn from(socket_addr: SocketAddr) -> Self {
        Address {
            ip: socket_addr.ip(),
            port: socket_addr.port(),
        }
    }
}

impl From<Address> for SocketAddr {
    fn from(address: Address) -> Self {
        SocketAddr::new(address.ip, address.port)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            IpAddr::V4(_) => write!(f, "{}:{}", self.ip, self.port),
            IpAddr::V6(_) => write!(f, "[{}]:{}", self.ip, self.port),
        }
    }
}
