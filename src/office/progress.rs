/*!
 * Global Progress
 * Finished-student count and the one-way shutdown latch
 */

use crate::core::errors::InvariantViolation;

/// Completion tracking for the whole run
///
/// `shutdown` flips false -> true exactly once, when the last student
/// finishes, and never resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalProgress {
    total: u32,
    finished: u32,
    shutdown: bool,
}

impl GlobalProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            finished: 0,
            shutdown: false,
        }
    }

    /// Count one more finished student
    ///
    /// Returns `true` only for the call that latched shutdown.
    pub fn record_finish(&mut self) -> Result<bool, InvariantViolation> {
        if self.finished >= self.total {
            return Err(InvariantViolation::FinishedOverflow {
                finished: self.finished + 1,
                total: self.total,
            });
        }

        self.finished += 1;
        if self.finished == self.total {
            self.shutdown = true;
            return Ok(true);
        }
        Ok(false)
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    #[inline]
    pub fn finished(&self) -> u32 {
        self.finished
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }
}
