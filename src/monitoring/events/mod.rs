/*!
 * Event System
 * Strongly-typed office events, one variant per protocol transition
 */

use crate::core::types::{RequestNo, SeatIndex, StudentId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Seat admission and rejection
    Admission,
    /// TA call / help / release
    Service,
    /// Completion and shutdown
    Lifecycle,
}

/// Unified event type - every protocol transition flows through this
///
/// Per student the order is always
/// `Admitted -> Called -> ServiceStarted -> ServiceEnded` for each request,
/// followed by one `StudentFinished`. The TA side ends with `ShutdownLatched`
/// (published by the last student) and then `TaStopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OfficeEvent {
    Admitted {
        student: StudentId,
        seat: SeatIndex,
        waiting: usize,
        capacity: usize,
        request: RequestNo,
        requests: RequestNo,
    },
    Rejected {
        student: StudentId,
        capacity: usize,
        request: RequestNo,
        requests: RequestNo,
    },
    Called {
        student: StudentId,
        waiting: usize,
    },
    ServiceStarted {
        student: StudentId,
        duration_ms: u64,
    },
    ServiceEnded {
        student: StudentId,
    },
    StudentFinished {
        student: StudentId,
        finished: u32,
        total: u32,
    },
    ShutdownLatched {
        total: u32,
    },
    TaStopped {
        served: u64,
    },
}

impl OfficeEvent {
    /// Student this event concerns, if any
    pub fn student(&self) -> Option<StudentId> {
        match self {
            OfficeEvent::Admitted { student, .. }
            | OfficeEvent::Rejected { student, .. }
            | OfficeEvent::Called { student, .. }
            | OfficeEvent::ServiceStarted { student, .. }
            | OfficeEvent::ServiceEnded { student }
            | OfficeEvent::StudentFinished { student, .. } => Some(*student),
            OfficeEvent::ShutdownLatched { .. } | OfficeEvent::TaStopped { .. } => None,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            OfficeEvent::Admitted { .. } | OfficeEvent::Rejected { .. } => Category::Admission,
            OfficeEvent::Called { .. }
            | OfficeEvent::ServiceStarted { .. }
            | OfficeEvent::ServiceEnded { .. } => Category::Service,
            OfficeEvent::StudentFinished { .. }
            | OfficeEvent::ShutdownLatched { .. }
            | OfficeEvent::TaStopped { .. } => Category::Lifecycle,
        }
    }

    /// Emit the human-readable narration for this event
    pub fn log(&self) {
        match *self {
            OfficeEvent::Admitted {
                student,
                seat,
                waiting,
                capacity,
                request,
                requests,
            } => info!(
                student,
                seat,
                waiting,
                capacity,
                request,
                requests,
                "S{:02} sits in hallway chair ({}/{})",
                student,
                waiting,
                capacity
            ),
            OfficeEvent::Rejected {
                student,
                capacity,
                request,
                requests,
            } => debug!(
                student,
                capacity,
                request,
                requests,
                "S{:02} finds the hallway full, will try later",
                student
            ),
            OfficeEvent::Called { student, waiting } => {
                info!(student, waiting, "TA calls S{:02}, waiting now = {}", student, waiting)
            }
            OfficeEvent::ServiceStarted {
                student,
                duration_ms,
            } => info!(student, duration_ms, "S{:02} getting help from TA", student),
            OfficeEvent::ServiceEnded { student } => {
                info!(student, "S{:02} done getting help", student)
            }
            OfficeEvent::StudentFinished {
                student,
                finished,
                total,
            } => info!(
                student,
                finished,
                total,
                "S{:02} finished all requests",
                student
            ),
            OfficeEvent::ShutdownLatched { total } => {
                info!(total, "All students finished, waking TA")
            }
            OfficeEvent::TaStopped { served } => {
                info!(served, "No more students, TA going home")
            }
        }
    }
}
