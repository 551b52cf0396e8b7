/*!
 * Lock-Free Office Statistics
 * Atomic counters updated from the TA and student threads
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Atomic office statistics
///
/// All operations use relaxed ordering; the numbers are only read after the
/// threads have been joined or for diagnostics.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct OfficeStats {
    admissions: AtomicU64,
    rejections: AtomicU64,
    services: AtomicU64,
    peak_occupancy: AtomicUsize,
}

/// Point-in-time copy of `OfficeStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub admissions: u64,
    pub rejections: u64,
    pub services: u64,
    pub peak_occupancy: usize,
}

impl OfficeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a seat handed out while `occupancy` students are seated
    #[inline(always)]
    pub fn record_admission(&self, occupancy: usize) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
        self.peak_occupancy.fetch_max(occupancy, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_service(&self) {
        self.services.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            admissions: self.admissions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            services: self.services.load(Ordering::Relaxed),
            peak_occupancy: self.peak_occupancy.load(Ordering::Relaxed),
        }
    }
}
