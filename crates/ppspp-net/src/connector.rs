//! Connector (C8) — pools and tracks endpoints the way the original
//! `BaseConnector`/`Connection` pair does: a LIFO pool of idle endpoints per
//! address, and a set of endpoints currently handed out per address, so a
//! released connection can be reused instead of re-established.

use crate::address::Address;
use crate::config::ConnectorConfig;
use crate::endpoint::{Endpoint, EndpointFactory};
use crate::error::NetError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Manages the lifecycle of [`Endpoint`]s: creates them on demand, pools
/// idle ones for reuse, and closes everything on shutdown.
pub struct Connector {
    factory: Arc<dyn EndpointFactory>,
    config: ConnectorConfig,
    pool: Mutex<HashMap<Address, Vec<Arc<dyn Endpoint>>>>,
    acquired: Mutex<HashMap<Address, HashMap<u64, Arc<dyn Endpoint>>>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl Connector {
    pub fn new(factory: Arc<dyn EndpointFactory>, config: ConnectorConfig) -> Arc<Self> {
        Arc::new(Connector {
            factory,
            config,
            pool: Mutex::new(HashMap::new()),
            acquired: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Establishes an outgoing connection to `remote_address`, reusing a
    /// pooled endpoint for that address if one is idle.
    pub async fn connect(self: &Arc<Self>, remote_address: Address) -> Result<Connection, NetError> {
        self.acquire(remote_address, None, Some(remote_address)).await
    }

    /// Creates a connection for incoming traffic bound to `local_address`.
    pub async fn listen(self: &Arc<Self>, local_address: Address) -> Result<Connection, NetError> {
        self.acquire(local_address, Some(local_address), None).await
    }

    async fn acquire(
        self: &Arc<Self>,
        key: Address,
        local_address: Option<Address>,
        remote_address: Option<Address>,
    ) -> Result<Connection, NetError> {
        if let Some(endpoint) = self.take_pooled(key) {
            return Ok(self.spawn_connection(key, endpoint));
        }

        let create = self.factory.create_endpoint(local_address, remote_address);
        let endpoint = match self.config.connect_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, create)
                .await
                .map_err(|_| NetError::ConnectTimeout(key))??,
            None => create.await?,
        };

        Ok(self.spawn_connection(key, endpoint))
    }

    fn take_pooled(&self, key: Address) -> Option<Arc<dyn Endpoint>> {
        let mut pool = self.pool.lock().unwrap();
        let endpoints = pool.get_mut(&key)?;
        let endpoint = endpoints.pop();
        if endpoints.is_empty() {
            pool.remove(&key);
        }
        // The pool never retains an empty Vec under a key (original source's
        // `assert key not in self._pool` after a full drain).
        debug_assert!(pool.get(&key).map_or(true, |e| !e.is_empty()));
        endpoint
    }

    fn spawn_connection(self: &Arc<Self>, key: Address, endpoint: Arc<dyn Endpoint>) -> Connection {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.acquired
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .insert(id, endpoint.clone());
        tracing::debug!(%key, id, "connection acquired");
        Connection {
            id,
            key,
            endpoint,
            connector: self.clone(),
            finished: AtomicBool::new(false),
        }
    }

    /// Closes `connection`'s endpoint and drops it from the acquired set.
    /// Does not return it to the pool: the underlying endpoint is gone.
    pub fn close_connection(&self, key: Address, id: u64) {
        if self.closed() {
            return;
        }
        let endpoint = self.remove_acquired(key, id);
        if let Some(endpoint) = endpoint {
            endpoint.close();
            tracing::debug!(%key, id, "connection closed");
        }
    }

    /// Moves `connection`'s endpoint back into the pool for reuse.
    pub fn release_connection(&self, key: Address, id: u64) {
        if self.closed() {
            return;
        }
        let endpoint = self.remove_acquired(key, id);
        if let Some(endpoint) = endpoint {
            self.pool.lock().unwrap().entry(key).or_default().push(endpoint);
            tracing::debug!(%key, id, "connection released to pool");
        }
    }

    fn remove_acquired(&self, key: Address, id: u64) -> Option<Arc<dyn Endpoint>> {
        let mut acquired = self.acquired.lock().unwrap();
        let for_key = acquired.get_mut(&key)?;
        let endpoint = for_key.remove(&id);
        if for_key.is_empty() {
            acquired.remove(&key);
        }
        endpoint
    }

    /// Closes the connector and every endpoint it knows about, pooled or
    /// acquired. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut pool = self.pool.lock().unwrap();
        for endpoint in pool.values().flatten() {
            endpoint.close();
        }
        pool.clear();

        let mut acquired = self.acquired.lock().unwrap();
        for endpoint in acquired.values().flat_map(|m| m.values()) {
            endpoint.close();
        }
        acquired.clear();
    }
}

impl Drop for Connector {
    fn drop(&mut self) {
        if self.closed() {
            return;
        }
        let leaked = !self.pool.lock().unwrap().is_empty() || !self.acquired.lock().unwrap().is_empty();
        if leaked {
            tracing::warn!("connector dropped without close() while endpoints were still live");
        }
        self.close();
    }
}

/// A handle to a live endpoint, acquired from a [`Connector`].
///
/// Dropping a `Connection` without calling [`close`](Connection::close) or
/// [`release`](Connection::release) closes its endpoint and logs a warning,
/// mirroring the original's `ResourceWarning` on an unclosed connection.
pub struct Connection {
    id: u64,
    key: Address,
    endpoint: Arc<dyn Endpoint>,
    connector: Arc<Connector>,
    finished: AtomicBool,
}

impl Connection {
    pub async fn recv(&self) -> Result<(Vec<u8>, Address), NetError> {
        if self.closed() {
            return Err(NetError::NotConnected);
        }
        self.endpoint.recv().await
    }

    pub async fn send(&self, data: &[u8], remote_address: Option<Address>) -> Result<(), NetError> {
        if self.closed() {
            return Err(NetError::NotConnected);
        }
        self.endpoint.send(data, remote_address).await
    }

    pub fn local_address(&self) -> Option<Address> {
        self.endpoint.local_address()
    }

    pub fn remote_address(&self) -> Option<Address> {
        self.endpoint.remote_address()
    }

    pub fn closed(&self) -> bool {
        self.endpoint.closed()
    }

    /// Closes the connection. Idempotent.
    pub fn close(&self) {
        if !self.finished.swap(true, Ordering::SeqCst) {
            self.connector.close_connection(self.key, self.id);
        }
    }

    /// Releases the connection back to the connector's pool. Idempotent.
    pub fn release(&self) {
        if !self.finished.swap(true, Ordering::SeqCst) {
            self.connector.release_connection(self.key, self.id);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::warn!(key = %self.key, id = self.id, "connection dropped without close() or release()");
        self.connector.close_connection(self.key, self.id);
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("key", &self.key)
            .field("local_address", &self.local_address())
            .field("remote_address", &self.remote_address())
            .field("closed", &self.closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::AtomicUsize;

    struct FakeEndpoint {
        closed: AtomicBool,
    }

    #[async_trait]
    impl Endpoint for FakeEndpoint {
        async fn recv(&self) -> Result<(Vec<u8>, Address), NetError> {
            Err(NetError::NotConnected)
        }
        async fn send(&self, _data: &[u8], _remote_address: Option<Address>) -> Result<(), NetError> {
            Ok(())
        }
        fn local_address(&self) -> Option<Address> {
            None
        }
        fn remote_address(&self) -> Option<Address> {
            None
        }
        fn closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    struct CountingFactory {
        created: AtomicUsize,
    }

    #[async_trait]
    impl EndpointFactory for CountingFactory {
        async fn create_endpoint(
            &self,
            _local_address: Option<Address>,
            _remote_address: Option<Address>,
        ) -> Result<Arc<dyn Endpoint>, NetError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeEndpoint {
                closed: AtomicBool::new(false),
            }))
        }
    }

    fn addr(port: u16) -> Address {
        Address::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[tokio::test]
    async fn release_then_connect_reuses_the_pooled_endpoint() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let connector = Connector::new(factory.clone(), ConnectorConfig::default());

        let first = connector.connect(addr(9000)).await.unwrap();
        first.release();
        let _second = connector.connect(addr(9000)).await.unwrap();

        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_connection_does_not_return_it_to_the_pool() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let connector = Connector::new(factory.clone(), ConnectorConfig::default());

        let first = connector.connect(addr(9001)).await.unwrap();
        first.close();
        let _second = connector.connect(addr(9001)).await.unwrap();

        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn close_connection_is_idempotent() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let connector = Connector::new(factory, ConnectorConfig::default());

        let connection = connector.connect(addr(9002)).await.unwrap();
        connection.close();
        connection.close();
    }

    #[tokio::test]
    async fn closing_the_connector_closes_acquired_endpoints() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
        });
        let connector = Connector::new(factory, ConnectorConfig::default());

        let connection = connector.connect(addr(9003)).await.unwrap();
        connector.close();
        assert!(connection.closed());
    }
}
