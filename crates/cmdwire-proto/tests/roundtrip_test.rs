//! Property tests for command framing.
//!
//! Any command that encodes must decode back to an equal command, both from
//! an in-memory buffer and from a blocking reader.

use std::{
    io::Cursor,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use bytes::Bytes;
use cmdwire_proto::{Command, CommandKind, DecodeLimits, Origin, ProtocolError, read_command};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = CommandKind> {
    proptest::sample::select(CommandKind::ALL.to_vec())
}

fn arb_origin() -> impl Strategy<Value = Origin> {
    prop_oneof![
        any::<u32>().prop_map(|bits| Origin::from(Ipv4Addr::from(bits))),
        any::<u128>().prop_map(|bits| Origin::from(Ipv6Addr::from(bits))),
        "[a-z][a-z0-9-]{0,30}(\\.[a-z][a-z0-9-]{0,30}){0,3}"
            .prop_map(|name| Origin::host(name).expect("generated names are ASCII")),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    (arb_kind(), arb_origin(), proptest::option::of(proptest::collection::vec(any::<u8>(), 0..512)))
        .prop_map(|(kind, origin, metadata)| Command::new(kind, origin, metadata.map(Bytes::from)))
}

proptest! {
    #[test]
    fn decode_inverts_encode(command in arb_command()) {
        let mut bytes = command.to_bytes().expect("small commands encode");
        prop_assert_eq!(bytes.len(), command.encoded_len());

        let decoded = Command::decode(&mut bytes).expect("encoded frame decodes");
        prop_assert_eq!(&decoded, &command);
        prop_assert!(bytes.is_empty());
    }

    #[test]
    fn read_command_inverts_encode(commands in proptest::collection::vec(arb_command(), 1..8)) {
        let mut stream = Vec::new();
        for command in &commands {
            command.encode(&mut stream).expect("small commands encode");
        }

        let mut reader = Cursor::new(stream);
        let limits = DecodeLimits::default();
        for command in &commands {
            let decoded = read_command(&mut reader, &limits).expect("encoded frame reads");
            prop_assert_eq!(&decoded, command);
        }
    }

    #[test]
    fn host_accepted_iff_within_decode_limit(len in 1usize..=2 * Origin::MAX_HOST_LEN) {
        let limits = DecodeLimits::default();
        match Origin::host("a".repeat(len)) {
            Ok(origin) => {
                prop_assert!(len <= limits.max_origin_len);
                let command = Command::bare(CommandKind::Message, origin);
                let mut bytes = command.to_bytes().expect("small commands encode");
                let decoded = Command::decode_with_limits(&mut bytes, &limits);
                prop_assert_eq!(decoded.expect("accepted host decodes"), command);
            }
            Err(ProtocolError::OriginTooLong { len: rejected, max }) => {
                prop_assert!(len > limits.max_origin_len);
                prop_assert_eq!(rejected, len);
                prop_assert_eq!(max, Origin::MAX_HOST_LEN);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn kind_code_is_first_field(kind in arb_kind()) {
        let bytes = Command::bare(kind, IpAddr::V4(Ipv4Addr::LOCALHOST))
            .to_bytes()
            .expect("small commands encode");
        prop_assert_eq!(&bytes[..4], &kind.to_u32().to_le_bytes());
    }
}
