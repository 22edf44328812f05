//! Blocking counting semaphore.
//!
//! Built on a `Mutex<usize>` and a `Condvar`. The internal lock is held only
//! inside `acquire` and `release`, never while a permit is outstanding, so a
//! panicking permit holder does not poison it.

use std::{
    sync::{Condvar, Mutex, MutexGuard},
    time::Duration,
};

use crate::{error::GuardError, guard::ExclusionGuard};

/// Counting semaphore with a fixed maximum.
///
/// [`Semaphore::binary`] gives the one-send-in-flight configuration used for
/// a shared sink.
#[derive(Debug)]
pub struct Semaphore {
    count: Mutex<usize>,
    available: Condvar,
    max: usize,
}

impl Semaphore {
    /// Semaphore holding `initial` permits, never more than `max`.
    ///
    /// `initial` is clamped to `max`.
    pub fn new(initial: usize, max: usize) -> Self {
        Self { count: Mutex::new(initial.min(max)), available: Condvar::new(), max }
    }

    /// One permit, maximum one.
    pub fn binary() -> Self {
        Self::new(1, 1)
    }

    /// Maximum count.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Permits currently available.
    pub fn available(&self) -> Result<usize, GuardError> {
        Ok(*self.lock()?)
    }

    /// Take a permit if one is available, without blocking.
    pub fn try_acquire(&self) -> Result<bool, GuardError> {
        let mut count = self.lock()?;
        if *count == 0 {
            return Ok(false);
        }
        *count -= 1;
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, usize>, GuardError> {
        self.count.lock().map_err(|_| GuardError::Poisoned)
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::binary()
    }
}

impl ExclusionGuard for Semaphore {
    fn acquire(&self) -> Result<(), GuardError> {
        let mut count = self
            .available
            .wait_while(self.lock()?, |count| *count == 0)
            .map_err(|_| GuardError::Poisoned)?;
        *count -= 1;
        Ok(())
    }

    fn acquire_timeout(&self, timeout: Duration) -> Result<(), GuardError> {
        let (mut count, _) = self
            .available
            .wait_timeout_while(self.lock()?, timeout, |count| *count == 0)
            .map_err(|_| GuardError::Poisoned)?;
        if *count == 0 {
            return Err(GuardError::Timeout(timeout));
        }
        *count -= 1;
        Ok(())
    }

    fn release(&self) -> Result<usize, GuardError> {
        let mut count = self.lock()?;
        if *count >= self.max {
            return Err(GuardError::Overflow { max: self.max });
        }
        let prior = *count;
        *count += 1;
        self.available.notify_one();
        Ok(prior)
    }
}
