//! Endpoint abstraction (C7) — the interface a transport must provide so the
//! connector can manage it generically (spec §5, grounded in the original
//! source's `BaseProtocol`).
//!
//! An endpoint is a live datagram conversation: it may be bound to a single
//! remote peer (the outcome of `connect`) or left open to receive from
//! anyone (the outcome of `listen`). `close` is terminal; a closed endpoint
//! reports `None` for both addresses, mirroring the original's behavior of
//! tearing down its transport reference on close.

use crate::address::Address;
use crate::error::NetError;
use async_trait::async_trait;
use std::sync::Arc;

/// A live datagram conversation. Implementations must be cheap to clone via
/// `Arc` and safe to share across tasks.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Waits for the next inbound datagram and its sender.
    async fn recv(&self) -> Result<(Vec<u8>, Address), NetError>;

    /// Sends a datagram. `remote_address` is required unless the endpoint
    /// was created with one (e.g. via `connect`); a connected endpoint that
    /// also receives an explicit address sends there instead of its peer.
    async fn send(&self, data: &[u8], remote_address: Option<Address>) -> Result<(), NetError>;

    /// The address this endpoint is bound to locally, or `None` if closed.
    fn local_address(&self) -> Option<Address>;

    /// The address of the connected peer, or `None` if not bound to one
    /// (listening mode) or closed.
    fn remote_address(&self) -> Option<Address>;

    /// Whether this endpoint has been closed.
    fn closed(&self) -> bool;

    /// Tears down the endpoint's transport. Idempotent.
    fn close(&self);
}

/// Builds endpoints for a [`Connector`](crate::connector::Connector). One
/// implementation per transport (spec §5's C9 is the only shipped one:
/// [`crate::udp::UdpTransport`]).
#[async_trait]
pub trait EndpointFactory: Send + Sync {
    async fn create_endpoint(
        &self,
        local_address: Option<Address>,
        remote_address: Option<Address>,
    ) -> Result<Arc<dyn Endpoint>, NetError>;
}
