//! Read arbitrary bytes as a command stream through `read_command`.
//!
//! Uses tight limits so oversized length prefixes are exercised.
#![no_main]

use std::io::Cursor;

use cmdwire_proto::{DecodeLimits, read_command};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits { max_origin_len: 64, max_metadata_len: 4096 };
    let mut reader = Cursor::new(data);
    while read_command(&mut reader, &limits).is_ok() {}
});
