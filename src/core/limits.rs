/*!
 * Office Limits and Defaults
 *
 * Centralized location for the defaults the office falls back to when the
 * caller does not provide a value.
 */

use std::time::Duration;

// =============================================================================
// ROOM
// =============================================================================

/// Hallway chairs outside the TA's office
pub const DEFAULT_CHAIRS: usize = 3;

/// Help requests each student makes before going home
pub const DEFAULT_REQUESTS_PER_STUDENT: u32 = 5;

// =============================================================================
// PACING
// =============================================================================

/// Shortest programming stretch between help requests
pub const THINK_MIN: Duration = Duration::from_millis(200);

/// Longest programming stretch between help requests
pub const THINK_MAX: Duration = Duration::from_millis(900);

/// Shortest help session
pub const SERVICE_MIN: Duration = Duration::from_millis(200);

/// Longest help session
pub const SERVICE_MAX: Duration = Duration::from_millis(600);

// =============================================================================
// THREADS
// =============================================================================

/// Name of the coordinator thread
pub const TA_THREAD_NAME: &str = "ta";

/// Prefix for requester thread names (`student-01`, `student-02`, ...)
pub const STUDENT_THREAD_PREFIX: &str = "student";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides the chair count when it is not given on the command line
pub const CHAIRS_ENV: &str = "TA_CHAIRS";

/// Switches tracing output to JSON
pub const TRACE_JSON_ENV: &str = "TA_TRACE_JSON";
