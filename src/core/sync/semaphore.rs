/*!
 * Counting Semaphore
 *
 * Condvar-based counting signal built on parking_lot. Permits posted while
 * nobody waits are banked, so a post can never be lost.
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// What a `post` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Woke N blocked waiters (N >= 1)
    Woken(usize),
    /// Nobody was blocked; the permit stays banked
    NoWaiters,
}

impl WakeResult {
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }
}

#[derive(Debug, Default)]
struct Permits {
    available: usize,
    waiters: usize,
}

/// Counting semaphore
///
/// # Guarantees
///
/// - Every `post` is matched by exactly one successful `wait`/`try_wait`
/// - Waiters re-check the permit count after every wake, so spurious
///   wakeups never consume a permit that does not exist
pub struct Semaphore {
    permits: Mutex<Permits>,
    condvar: Condvar,
}

impl Semaphore {
    /// Create a semaphore holding `initial` permits
    pub fn new(initial: usize) -> Self {
        Self {
            permits: Mutex::new(Permits {
                available: initial,
                waiters: 0,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Add one permit and wake one blocked waiter, if any
    pub fn post(&self) -> WakeResult {
        let mut permits = self.permits.lock();
        permits.available += 1;
        let has_waiter = permits.waiters > 0;
        drop(permits);

        if has_waiter {
            self.condvar.notify_one();
            WakeResult::Woken(1)
        } else {
            WakeResult::NoWaiters
        }
    }

    /// Block until a permit is available, then take it
    pub fn wait(&self) {
        let mut permits = self.permits.lock();
        permits.waiters += 1;
        while permits.available == 0 {
            self.condvar.wait(&mut permits);
        }
        permits.waiters -= 1;
        permits.available -= 1;
    }

    /// Block for at most `timeout`
    ///
    /// Returns `true` if a permit was taken, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut permits = self.permits.lock();
        permits.waiters += 1;
        while permits.available == 0 {
            if self.condvar.wait_until(&mut permits, deadline).timed_out() {
                break;
            }
        }
        permits.waiters -= 1;

        if permits.available == 0 {
            return false;
        }
        permits.available -= 1;
        true
    }

    /// Take a permit without blocking
    pub fn try_wait(&self) -> bool {
        let mut permits = self.permits.lock();
        if permits.available == 0 {
            return false;
        }
        permits.available -= 1;
        true
    }

    /// Permits currently banked (for diagnostics)
    pub fn available(&self) -> usize {
        self.permits.lock().available
    }

    /// Threads currently blocked in `wait` (for diagnostics)
    pub fn waiter_count(&self) -> usize {
        self.permits.lock().waiters
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let permits = self.permits.lock();
        f.debug_struct("Semaphore")
            .field("available", &permits.available)
            .field("waiters", &permits.waiters)
            .finish()
    }
}
