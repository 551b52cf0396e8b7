/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::StudentId;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup configuration errors, always raised before any thread exists
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Number of students must be greater than zero")]
    #[diagnostic(
        code(config::no_students),
        help("Pass a positive student count, e.g. `sleeping-ta 10`.")
    )]
    NoStudents,

    #[error("Help requests per student must be greater than zero")]
    #[diagnostic(
        code(config::no_requests),
        help("Pass a positive request count, e.g. `sleeping-ta 10 5`.")
    )]
    NoRequests,

    #[error("Waiting room must have at least one chair")]
    #[diagnostic(
        code(config::no_chairs),
        help("Pass a positive chair count or set TA_CHAIRS.")
    )]
    NoChairs,

    #[error("Invalid delay range: min {min_ms}ms exceeds max {max_ms}ms")]
    #[diagnostic(
        code(config::invalid_delay_range),
        help("The lower bound of a uniform delay must not exceed the upper bound.")
    )]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },

    #[error("Invalid value for {name}: {value:?}")]
    #[diagnostic(
        code(config::invalid_argument),
        help("Usage: sleeping-ta <num_students> [help_requests_per_student] [chairs]")
    )]
    InvalidArgument { name: String, value: String },

    #[error("Missing required argument: {0}")]
    #[diagnostic(
        code(config::missing_argument),
        help("Usage: sleeping-ta <num_students> [help_requests_per_student] [chairs]")
    )]
    MissingArgument(String),
}

/// Which half of a student's rendezvous pair a signal belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// TA invites the student in
    Called,
    /// TA releases the student after helping
    Served,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Called => f.write_str("called"),
            SignalKind::Served => f.write_str("served"),
        }
    }
}

/// Broken protocol invariants. These are programming defects, never
/// recoverable runtime conditions.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum InvariantViolation {
    #[error("Waiting room occupancy {occupancy} outside [0, {capacity}]")]
    #[diagnostic(code(invariant::occupancy_out_of_range))]
    OccupancyOutOfRange { occupancy: usize, capacity: usize },

    #[error("Dequeue from an empty waiting room")]
    #[diagnostic(
        code(invariant::empty_room),
        help("An arrival token was consumed without a seated student.")
    )]
    EmptyRoom,

    #[error("Signal '{signal}' posted twice to student {student} within one cycle")]
    #[diagnostic(code(invariant::double_signal))]
    DoubleSignal { student: StudentId, signal: SignalKind },

    #[error("Student {student} hung up before receiving '{signal}'")]
    #[diagnostic(code(invariant::line_closed))]
    LineClosed { student: StudentId, signal: SignalKind },

    #[error("No service line registered for student {0}")]
    #[diagnostic(code(invariant::unknown_student))]
    UnknownStudent(StudentId),

    #[error("Service line for student {0} registered twice")]
    #[diagnostic(code(invariant::duplicate_student))]
    DuplicateStudent(StudentId),

    #[error("{finished} students finished but only {total} exist")]
    #[diagnostic(code(invariant::finished_overflow))]
    FinishedOverflow { finished: u32, total: u32 },
}

/// Unified office error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum OfficeError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Failed to acquire {resource}: {reason}")]
    #[diagnostic(
        code(office::resource_error),
        help("The environment refused a one-time setup resource (thread or primitive). Check system limits.")
    )]
    Resource { resource: String, reason: String },

    #[error("Invariant violated: {0}")]
    #[diagnostic(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("Thread {0} panicked")]
    #[diagnostic(
        code(office::thread_panicked),
        help("A participant thread panicked. See the log above for the panic message.")
    )]
    ThreadPanicked(String),
}

impl OfficeError {
    /// Build a resource error from a failed OS call
    pub fn resource(resource: impl Into<String>, err: std::io::Error) -> Self {
        OfficeError::Resource {
            resource: resource.into(),
            reason: err.to_string(),
        }
    }
}
