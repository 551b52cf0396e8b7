/*!
 * Office
 * Sleeping-TA rendezvous: one coordinator, many students, a bounded hallway
 *
 * # Architecture
 *
 * - `seats`: fixed-capacity FIFO ring of chairs
 * - `progress`: finished count and the one-way shutdown latch
 * - `room`: ring + progress behind one lock, plus the arrival signal
 * - `lines`: per-student one-shot call/serve channels
 * - `coordinator` / `requester`: the TA and student state machines
 * - `session`: spawn, join and report
 *
 * # Protocol
 *
 * ```text
 * student: try_enter --admitted--> post arrival --> await call --> await served
 * TA:      wait arrival --> next_step (pop | stop) --> call --> help --> serve
 * ```
 */

mod config;
mod coordinator;
mod lines;
mod pacing;
mod progress;
mod requester;
mod room;
mod seats;
mod session;
mod stats;

pub use config::{OfficeConfig, OfficeConfigBuilder};
pub use coordinator::{Coordinator, CoordinatorState};
pub use lines::{ServiceLines, StudentLine};
pub use pacing::{DelayPolicy, Pacing};
pub use progress::GlobalProgress;
pub use requester::{Requester, RequesterState, RequesterSummary};
pub use room::{HelpRequest, NextStep, RoomSnapshot, WaitingRoom};
pub use seats::{Admission, SeatRing};
pub use session::{Office, SessionReport};
pub use stats::{OfficeStats, StatsSnapshot};

use crate::core::errors::InvariantViolation;

/// Counting signal the TA sleeps on: one token per admission, one on shutdown
pub type ArrivalSignal = crate::core::sync::Semaphore;

/// Abort on a broken protocol invariant
///
/// Shared state can no longer be trusted, so nothing is unwound.
pub fn fail_fast(violation: InvariantViolation) -> ! {
    tracing::error!(error = %violation, "Office invariant violated, aborting");
    std::process::abort()
}
