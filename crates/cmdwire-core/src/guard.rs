//! Exclusion guard abstraction.
//!
//! A guard serializes whole send attempts on one sink. The send path never
//! calls [`ExclusionGuard::release`] directly: it holds a [`Permit`], whose
//! release runs on every exit path once the acquire succeeded.

use std::{sync::Arc, time::Duration};

use tracing::warn;

use crate::error::GuardError;

/// Mutual-exclusion primitive shared by every sender on one sink.
pub trait ExclusionGuard {
    /// Block until a permit is available and take it.
    fn acquire(&self) -> Result<(), GuardError>;

    /// Like [`acquire`](Self::acquire), giving up after `timeout`.
    ///
    /// Guards without timeout support block indefinitely.
    fn acquire_timeout(&self, _timeout: Duration) -> Result<(), GuardError> {
        self.acquire()
    }

    /// Return a permit. Yields the count before the release.
    fn release(&self) -> Result<usize, GuardError>;
}

impl<G: ExclusionGuard + ?Sized> ExclusionGuard for &G {
    fn acquire(&self) -> Result<(), GuardError> {
        (**self).acquire()
    }

    fn acquire_timeout(&self, timeout: Duration) -> Result<(), GuardError> {
        (**self).acquire_timeout(timeout)
    }

    fn release(&self) -> Result<usize, GuardError> {
        (**self).release()
    }
}

impl<G: ExclusionGuard + ?Sized> ExclusionGuard for Arc<G> {
    fn acquire(&self) -> Result<(), GuardError> {
        (**self).acquire()
    }

    fn acquire_timeout(&self, timeout: Duration) -> Result<(), GuardError> {
        (**self).acquire_timeout(timeout)
    }

    fn release(&self) -> Result<usize, GuardError> {
        (**self).release()
    }
}

/// Scoped hold on an exclusion guard.
///
/// Exists only after a successful acquire. Released exactly once, either
/// explicitly through [`Permit::release`] or when dropped.
#[must_use = "dropping a permit releases the guard immediately"]
pub struct Permit<'a, G: ExclusionGuard + ?Sized> {
    guard: &'a G,
    released: bool,
}

impl<'a, G: ExclusionGuard + ?Sized> Permit<'a, G> {
    /// Block until the guard is acquired.
    pub fn acquire(guard: &'a G) -> Result<Self, GuardError> {
        guard.acquire()?;
        Ok(Self { guard, released: false })
    }

    /// Acquire, giving up after `timeout`.
    pub fn acquire_timeout(guard: &'a G, timeout: Duration) -> Result<Self, GuardError> {
        guard.acquire_timeout(timeout)?;
        Ok(Self { guard, released: false })
    }

    /// Release now and report the outcome.
    pub fn release(mut self) -> Result<usize, GuardError> {
        self.released = true;
        self.guard.release()
    }
}

impl<G: ExclusionGuard + ?Sized> Drop for Permit<'_, G> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(error) = self.guard.release() {
            warn!(%error, "exclusion guard release failed while dropping permit");
        }
    }
}
