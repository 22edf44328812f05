//! Decode arbitrary bytes as command frames.
//!
//! Decoding must never panic, and every decoded command must survive an
//! encode/decode cycle unchanged. Origin text may be normalized (IPv6
//! spelling), so the re-encoded bytes are not compared with the input.
#![no_main]

use bytes::Bytes;
use cmdwire_proto::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut buf = Bytes::copy_from_slice(data);
    while let Ok(command) = Command::decode(&mut buf) {
        let mut reencoded = command.to_bytes().expect("decoded command re-encodes");
        let again = Command::decode(&mut reencoded).expect("re-encoded command decodes");
        assert_eq!(again, command);
    }
});
