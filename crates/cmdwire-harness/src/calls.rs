//! Shared call log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cmdwire_proto::{Command, ProtocolError};

/// One observed call on a sink or guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Guard acquired.
    Acquire,
    /// Field written to the sink.
    Write(Vec<u8>),
    /// Sink flushed.
    Flush,
    /// Guard released.
    Release,
}

impl Call {
    /// Whether this call went to the sink.
    pub fn is_sink_call(&self) -> bool {
        matches!(self, Self::Write(_) | Self::Flush)
    }
}

/// Append-only log shared by every spy in a test.
///
/// Clones refer to the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call.
    pub fn record(&self, call: Call) {
        self.lock().push(call);
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    /// Snapshot of sink calls only.
    pub fn sink_calls(&self) -> Vec<Call> {
        self.lock().iter().filter(|call| call.is_sink_call()).cloned().collect()
    }

    /// Concatenation of every written field, as the peer would see it.
    pub fn written_bytes(&self) -> Vec<u8> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                Call::Write(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Number of times `call` was recorded.
    pub fn count(&self, call: &Call) -> usize {
        self.lock().iter().filter(|recorded| *recorded == call).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sink calls a successful send of `command` makes: one write and one flush
/// per field, in wire order.
pub fn expected_sink_calls(command: &Command) -> Result<Vec<Call>, ProtocolError> {
    let fields = command.frame_fields()?;
    Ok(fields
        .iter()
        .flat_map(|(_, bytes)| [Call::Write(bytes.to_vec()), Call::Flush])
        .collect())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use cmdwire_proto::CommandKind;

    use super::*;

    #[test]
    fn clones_share_entries() {
        let log = CallLog::new();
        let other = log.clone();

        log.record(Call::Acquire);
        other.record(Call::Write(vec![1, 2]));
        other.record(Call::Flush);
        log.record(Call::Release);

        assert_eq!(
            log.calls(),
            vec![Call::Acquire, Call::Write(vec![1, 2]), Call::Flush, Call::Release]
        );
        assert_eq!(log.sink_calls(), vec![Call::Write(vec![1, 2]), Call::Flush]);
        assert_eq!(log.written_bytes(), vec![1, 2]);
        assert_eq!(log.count(&Call::Flush), 1);
    }

    #[test]
    fn expected_calls_cover_empty_metadata() {
        let command = Command::bare(CommandKind::UserExit, Ipv4Addr::LOCALHOST);
        let calls = expected_sink_calls(&command).unwrap();

        assert_eq!(calls.len(), 10);
        assert_eq!(calls[8], Call::Write(Vec::new()));
        assert_eq!(calls[9], Call::Flush);
    }
}
