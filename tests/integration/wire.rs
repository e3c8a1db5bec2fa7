//! Wire codec scenarios, exercised through the public `ppspp-core` API the
//! way an application would call it.

use ppspp_core::{datagram, protocol_options, ChannelID, CodecError, Datagram, MessageType};

#[test]
fn channel_id_round_trip() {
    let data = [0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38];
    let (id, rest) = ppspp_core::channel_id::decode(&data).unwrap();
    assert_eq!(id.as_bytes(), &[0x31, 0x32, 0x33, 0x34]);
    assert_eq!(rest, &[0x35, 0x36, 0x37, 0x38]);
}

#[test]
fn empty_datagram_round_trip() {
    let datagram = Datagram {
        channel_id: ChannelID::new(&[0x00, 0x00, 0x00, 0x01]).unwrap(),
        messages: vec![],
    };
    let encoded = datagram::encode(&datagram);
    assert_eq!(encoded, vec![0x00, 0x00, 0x00, 0x01]);
    assert_eq!(datagram::decode(&encoded).unwrap(), datagram);
}

#[test]
fn supported_messages_rfc_example_round_trips_through_the_public_api() {
    let fragment = [0x08, 0x02, 0xD9, 0xF0, 0xFF];
    let (options, rest) = protocol_options::decode(&fragment).unwrap();
    assert!(rest.is_empty());

    let messages = options.supported_messages.unwrap();
    for excluded in [
        MessageType::ACK,
        MessageType::PEX_REQ,
        MessageType::PEX_RESv4,
        MessageType::PEX_RESv6,
        MessageType::PEX_REScert,
    ] {
        assert!(!messages.contains(&excluded));
    }
    assert!(messages.contains(&MessageType::HANDSHAKE));
    assert!(messages.contains(&MessageType::UNCHOKE));

    assert_eq!(
        protocol_options::encode(&options),
        vec![0x08, 0x02, 0xD9, 0xF0, 0xFF]
    );
}

#[test]
fn malformed_swarm_identifier_fails_with_short_read() {
    let err = protocol_options::decode(&[0x02, 0x00, 0x10, 0x00]).unwrap_err();
    assert_eq!(err, CodecError::ShortRead { needed: 16, available: 1 });
}

#[test]
fn duplicate_version_option_fails() {
    let err = protocol_options::decode(&[0x00, 0x01, 0x00, 0x01]).unwrap_err();
    assert_eq!(err, CodecError::DuplicateOption(0));
}
