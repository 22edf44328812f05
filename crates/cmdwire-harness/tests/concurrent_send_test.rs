//! Concurrent senders on one sink.
//!
//! Several threads each own a clone of one recording sink and share one spy
//! guard. The log must show whole frames bracketed by acquire/release, never
//! two frames interleaved, and the byte stream must decode into exactly the
//! commands that were sent.

use std::{collections::HashMap, io::Cursor, net::Ipv4Addr, sync::Arc, thread};

use bytes::Bytes;
use cmdwire_core::CommandClient;
use cmdwire_harness::{Call, CallLog, RecordingSink, SpyGuard};
use cmdwire_proto::{Command, CommandKind, DecodeLimits, read_command};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SENDERS: u8 = 6;
const COMMANDS_PER_SENDER: usize = 40;
const CALLS_PER_FRAME: usize = 10;

/// Commands for one sender. The origin's last octet identifies the sender.
fn workload(sender: u8, seed: u64) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ u64::from(sender));
    (0..COMMANDS_PER_SENDER)
        .map(|_| {
            let kind = CommandKind::ALL[rng.gen_range(0..CommandKind::ALL.len())];
            let len = rng.gen_range(0..48);
            let metadata: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
            Command::new(kind, Ipv4Addr::new(10, 0, 0, sender), Some(Bytes::from(metadata)))
        })
        .collect()
}

fn run(seed: u64) {
    let log = CallLog::new();
    let guard = Arc::new(SpyGuard::binary(log.clone()));
    let sink = RecordingSink::new(log.clone());

    let workloads: Vec<Vec<Command>> = (1..=SENDERS).map(|sender| workload(sender, seed)).collect();

    let handles: Vec<_> = workloads
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, commands)| {
            let mut client =
                CommandClient::new(format!("sender-{index}"), sink.clone(), Arc::clone(&guard));
            thread::spawn(move || {
                for command in &commands {
                    client.send_command(command).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = usize::from(SENDERS) * COMMANDS_PER_SENDER;
    assert_eq!(guard.acquire_count(), total);
    assert_eq!(guard.release_count(), total);

    // Acquire, ten sink calls, release; repeated with nothing in between.
    let calls = log.calls();
    assert_eq!(calls.len(), total * (CALLS_PER_FRAME + 2));
    for (index, frame) in calls.chunks(CALLS_PER_FRAME + 2).enumerate() {
        assert_eq!(frame[0], Call::Acquire, "frame {index} does not start with acquire");
        assert_eq!(frame[CALLS_PER_FRAME + 1], Call::Release, "frame {index} not released");
        assert!(frame[1..=CALLS_PER_FRAME].iter().all(Call::is_sink_call));
    }

    // Decoding the stream yields each sender's commands in its own order.
    let mut reader = Cursor::new(log.written_bytes());
    let limits = DecodeLimits::default();
    let mut received: HashMap<u8, Vec<Command>> = HashMap::new();
    for _ in 0..total {
        let command = read_command(&mut reader, &limits).unwrap();
        let sender = match command.origin().ip() {
            Some(std::net::IpAddr::V4(ip)) => ip.octets()[3],
            other => panic!("unexpected origin {other:?}"),
        };
        received.entry(sender).or_default().push(command);
    }
    assert_eq!(reader.position() as usize, reader.get_ref().len());

    for (sender, expected) in (1..=SENDERS).zip(workloads) {
        assert_eq!(received.remove(&sender), Some(expected), "sender {sender}");
    }
}

#[test]
fn frames_never_interleave() {
    run(0x5EED);
}

#[test]
fn frames_never_interleave_other_seeds() {
    for seed in [1, 42, 0xDEAD_BEEF] {
        run(seed);
    }
}
