//! Recording sink with fault injection.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use cmdwire_core::CommandSink;
use cmdwire_proto::FrameField;

use crate::calls::{Call, CallLog};

/// Which sink call, if any, fails.
///
/// Calls are numbered from 0 across writes and flushes together, so for a
/// single frame call `2k` writes field `k` and call `2k + 1` flushes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultPlan {
    fail_at: Option<usize>,
    kind: io::ErrorKind,
}

impl FaultPlan {
    /// Never fail.
    pub fn none() -> Self {
        Self { fail_at: None, kind: io::ErrorKind::BrokenPipe }
    }

    /// Fail the `call`-th sink call.
    pub fn fail_call(call: usize) -> Self {
        Self { fail_at: Some(call), ..Self::none() }
    }

    /// Fail the write of `field` in the first frame.
    pub fn fail_write(field: FrameField) -> Self {
        Self::fail_call(field.position() * 2)
    }

    /// Fail the flush after `field` in the first frame.
    pub fn fail_flush(field: FrameField) -> Self {
        Self::fail_call(field.position() * 2 + 1)
    }

    /// Error kind for the injected failure. Defaults to `BrokenPipe`.
    pub fn with_kind(self, kind: io::ErrorKind) -> Self {
        Self { kind, ..self }
    }

    fn check(&self, call: usize) -> io::Result<()> {
        if self.fail_at == Some(call) {
            return Err(io::Error::new(self.kind, format!("injected fault at sink call {call}")));
        }
        Ok(())
    }
}

impl Default for FaultPlan {
    fn default() -> Self {
        Self::none()
    }
}

/// Sink that records each successful call into a [`CallLog`].
///
/// Clones share the log and the call counter, like clones of one socket.
/// A failing call is not recorded.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    log: CallLog,
    plan: FaultPlan,
    next_call: Arc<AtomicUsize>,
}

impl RecordingSink {
    /// Sink that never fails.
    pub fn new(log: CallLog) -> Self {
        Self::with_faults(log, FaultPlan::none())
    }

    /// Sink failing according to `plan`.
    pub fn with_faults(log: CallLog, plan: FaultPlan) -> Self {
        Self { log, plan, next_call: Arc::new(AtomicUsize::new(0)) }
    }

    /// Log this sink records into.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Sink calls attempted so far, failed ones included.
    pub fn attempted_calls(&self) -> usize {
        self.next_call.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> io::Result<()> {
        let call = self.next_call.fetch_add(1, Ordering::SeqCst);
        self.plan.check(call)
    }
}

impl CommandSink for RecordingSink {
    fn write_field(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.begin_call()?;
        self.log.record(Call::Write(bytes.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.begin_call()?;
        self.log.record(Call::Flush);
        Ok(())
    }
}
