//! Scenario 6: two UDP endpoints on loopback exchange keepalives — empty
//! datagrams with distinct random channel IDs. This is the thin "datagram
//! codec composed with UDP I/O" application shim: exercised here as a test,
//! not exposed as a first-class library API.

use ppspp_core::{datagram, ChannelID, Datagram};
use ppspp_net::{Address, Connector, ConnectorConfig, UdpTransport};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

fn loopback() -> Address {
    Address::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
}

#[tokio::test]
async fn keepalive_exchange_round_trips_channel_ids() {
    let connector = Connector::new(Arc::new(UdpTransport::new(16)), ConnectorConfig::default());

    let a = connector.listen(loopback()).await.unwrap();
    let b = connector.listen(loopback()).await.unwrap();
    let b_address = b.local_address().unwrap();

    let a_channel_id = ChannelID::new_random();
    let b_channel_id = ChannelID::new_random();

    let a_keepalive = Datagram {
        channel_id: a_channel_id,
        messages: vec![],
    };
    a.send(&datagram::encode(&a_keepalive), Some(b_address)).await.unwrap();

    let (received, from) = b.recv().await.unwrap();
    assert_eq!(from, a.local_address().unwrap());
    let decoded = datagram::decode(&received).unwrap();
    assert_eq!(decoded.channel_id, a_channel_id);
    assert!(decoded.messages.is_empty());

    let b_keepalive = Datagram {
        channel_id: b_channel_id,
        messages: vec![],
    };
    b.send(&datagram::encode(&b_keepalive), Some(a.local_address().unwrap()))
        .await
        .unwrap();

    let (received, _from) = a.recv().await.unwrap();
    let decoded = datagram::decode(&received).unwrap();
    assert_eq!(decoded.channel_id, b_channel_id);
    assert!(decoded.messages.is_empty());
}
