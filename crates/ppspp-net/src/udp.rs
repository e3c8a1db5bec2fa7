//! UDP transport — the one concrete [`Endpoint`]/[`EndpointFactory`] pair
//! this crate ships, grounded in the original source's `udp.Protocol`/
//! `udp.Connector`: a background task reads the socket and buffers
//! datagrams into a channel, decoupling the caller's `recv` from the
//! kernel's readiness.

use crate::address::Address;
use crate::endpoint::{Endpoint, EndpointFactory};
use crate::error::NetError;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

const MAX_DATAGRAM_SIZE: usize = 65_527; // largest possible UDP payload over IPv4/IPv6

pub struct UdpEndpoint {
    socket: Arc<UdpSocket>,
    local_address: Address,
    remote_address: Option<Address>,
    receiver: AsyncMutex<mpsc::Receiver<(Vec<u8>, Address)>>,
    reader_task: JoinHandle<()>,
    closed: AtomicBool,
}

impl UdpEndpoint {
    fn new(socket: UdpSocket, local_address: Address, remote_address: Option<Address>, queue_capacity: usize) -> Self {
        let socket = Arc::new(socket);
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let reader_task = tokio::spawn(read_loop(socket.clone(), sender));
        UdpEndpoint {
            socket,
            local_address,
            remote_address,
            receiver: AsyncMutex::new(receiver),
            reader_task,
            closed: AtomicBool::new(false),
        }
    }
}

async fn read_loop(socket: Arc<UdpSocket>, sender: mpsc::Sender<(Vec<u8>, Address)>) {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => {
                if sender.send((buf[..len].to_vec(), Address::from(from))).await.is_err() {
                    break; // endpoint dropped, nobody left to receive
                }
            }
            Err(error) => {
                tracing::warn!(%error, "udp socket read failed, reader task exiting");
                break;
            }
        }
    }
}

#[async_trait]
impl Endpoint for UdpEndpoint {
    async fn recv(&self) -> Result<(Vec<u8>, Address), NetError> {
        if self.closed() {
            return Err(NetError::NotConnected);
        }
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or(NetError::NotConnected)
    }

    async fn send(&self, data: &[u8], remote_address: Option<Address>) -> Result<(), NetError> {
        if self.closed() {
            return Err(NetError::NotConnected);
        }
        let target = remote_address
            .or(self.remote_address)
            .ok_or_else(|| NetError::InvalidAddress("no remote address given or bound".to_string()))?;

        self.socket
            .send_to(data, SocketAddr::from(target))
            .await
            .map(|_| ())
            .map_err(|source| NetError::TransportError { address: target, source })
    }

    fn local_address(&self) -> Option<Address> {
        (!self.closed()).then_some(self.local_address)
    }

    fn remote_address(&self) -> Option<Address> {
        (!self.closed()).then(|| self.remote_address).flatten()
    }

    fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.reader_task.abort();
        }
    }
}

/// Builds [`UdpEndpoint`]s bound to a local address and optionally connected
/// to a remote one.
pub struct UdpTransport {
    receive_queue_capacity: usize,
}

impl UdpTransport {
    pub fn new(receive_queue_capacity: usize) -> Self {
        UdpTransport { receive_queue_capacity }
    }
}

#[async_trait]
impl EndpointFactory for UdpTransport {
    async fn create_endpoint(
        &self,
        local_address: Option<Address>,
        remote_address: Option<Address>,
    ) -> Result<Arc<dyn Endpoint>, NetError> {
        let bind_addr: SocketAddr = local_address
            .map(SocketAddr::from)
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 0)));

        let socket = UdpSocket::bind(bind_addr).await.map_err(|source| NetError::TransportError {
            address: local_address.unwrap_or(Address::new(bind_addr.ip(), bind_addr.port())),
            source,
        })?;

        if let Some(remote) = remote_address {
            socket
                .connect(SocketAddr::from(remote))
                .await
                .map_err(|source| NetError::TransportError { address: remote, source })?;
        }

        let local = Address::from(socket.local_addr().map_err(|source| NetError::TransportError {
            address: local_address.unwrap_or(Address::new(bind_addr.ip(), bind_addr.port())),
            source,
        })?);

        Ok(Arc::new(UdpEndpoint::new(socket, local, remote_address, self.receive_queue_capacity)))
    }
}
