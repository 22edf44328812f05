//! Spy exclusion guard.

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use cmdwire_core::{ExclusionGuard, GuardError, Semaphore};

use crate::calls::{Call, CallLog};

/// Guard that forwards to a real primitive and records every successful
/// acquire and every release attempt.
///
/// `Acquire` is logged after the inner acquire returns and `Release` before
/// the inner release runs, so entries of one holder never overlap the next
/// holder's in the log.
#[derive(Debug)]
pub struct SpyGuard<G = Semaphore> {
    inner: G,
    log: CallLog,
    refuse_acquire: bool,
    acquires: AtomicUsize,
    releases: AtomicUsize,
}

impl SpyGuard<Semaphore> {
    /// Spy over a binary semaphore.
    pub fn binary(log: CallLog) -> Self {
        Self::wrap(Semaphore::binary(), log)
    }
}

impl<G: ExclusionGuard> SpyGuard<G> {
    /// Spy over `inner`.
    pub fn wrap(inner: G, log: CallLog) -> Self {
        Self {
            inner,
            log,
            refuse_acquire: false,
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// Make every acquire fail without touching the inner primitive.
    pub fn refusing(mut self) -> Self {
        self.refuse_acquire = true;
        self
    }

    /// Wrapped primitive.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Successful acquires so far.
    pub fn acquire_count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Release calls so far.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn acquired(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        self.log.record(Call::Acquire);
    }
}

impl<G: ExclusionGuard> ExclusionGuard for SpyGuard<G> {
    fn acquire(&self) -> Result<(), GuardError> {
        if self.refuse_acquire {
            return Err(GuardError::Refused("spy guard set to refuse".into()));
        }
        self.inner.acquire()?;
        self.acquired();
        Ok(())
    }

    fn acquire_timeout(&self, timeout: Duration) -> Result<(), GuardError> {
        if self.refuse_acquire {
            return Err(GuardError::Refused("spy guard set to refuse".into()));
        }
        self.inner.acquire_timeout(timeout)?;
        self.acquired();
        Ok(())
    }

    fn release(&self) -> Result<usize, GuardError> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.log.record(Call::Release);
        self.inner.release()
    }
}
