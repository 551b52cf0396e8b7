/*!
 * Waiting Room
 * Bounded hallway shared by the TA and every student
 *
 * One `parking_lot::Mutex` guards the seat ring and the global progress, so
 * occupancy, head, tail, finished count and the shutdown latch always move
 * together. The lock is released before the arrival signal is posted and is
 * never held across a blocking wait.
 */

use super::progress::GlobalProgress;
use super::seats::{Admission, SeatRing};
use super::stats::OfficeStats;
use super::ArrivalSignal;
use crate::core::errors::InvariantViolation;
use crate::core::types::{RequestNo, StudentId};
use crate::monitoring::{EventStream, OfficeEvent};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One help request from one student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpRequest {
    pub student: StudentId,
    /// 1-based request number
    pub number: RequestNo,
    /// Requests this student makes in total
    pub of: RequestNo,
}

impl HelpRequest {
    pub fn new(student: StudentId, number: RequestNo, of: RequestNo) -> Self {
        Self {
            student,
            number,
            of,
        }
    }
}

/// What the TA does after waking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Help this student next
    Serve(StudentId),
    /// Everyone finished and the hallway is empty
    Stop,
}

/// Diagnostic view of the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub occupancy: usize,
    pub capacity: usize,
    pub seated: Vec<StudentId>,
    pub finished: u32,
    pub total: u32,
    pub shutdown: bool,
}

struct RoomState {
    seats: SeatRing,
    progress: GlobalProgress,
}

/// Shared waiting room
pub struct WaitingRoom {
    state: Mutex<RoomState>,
    arrivals: ArrivalSignal,
    events: EventStream,
    stats: OfficeStats,
}

impl WaitingRoom {
    /// Create a room with `capacity` chairs for `total_students` students
    pub fn new(capacity: usize, total_students: u32, events: EventStream) -> Self {
        Self {
            state: Mutex::new(RoomState {
                seats: SeatRing::new(capacity),
                progress: GlobalProgress::new(total_students),
            }),
            arrivals: ArrivalSignal::new(0),
            events,
            stats: OfficeStats::new(),
        }
    }

    /// Try to take a chair. Never blocks.
    ///
    /// On admission one arrival token is posted after the lock is released.
    pub fn try_enter(&self, request: HelpRequest) -> Admission {
        let mut state = self.state.lock();
        let capacity = state.seats.capacity();
        let admission = state.seats.try_seat(request.student);

        let event = match admission {
            Admission::Admitted(seat) => {
                let waiting = state.seats.occupancy();
                self.stats.record_admission(waiting);
                OfficeEvent::Admitted {
                    student: request.student,
                    seat,
                    waiting,
                    capacity,
                    request: request.number,
                    requests: request.of,
                }
            }
            Admission::Rejected => {
                self.stats.record_rejection();
                OfficeEvent::Rejected {
                    student: request.student,
                    capacity,
                    request: request.number,
                    requests: request.of,
                }
            }
        };
        self.events.forward(event.clone());
        drop(state);

        event.log();
        if admission.is_admitted() {
            self.arrivals.post();
        }
        admission
    }

    /// Block until a student arrives or the office closes
    pub fn wait_for_arrival(&self) {
        self.arrivals.wait();
    }

    /// Decide the TA's next step right after a wake
    ///
    /// Stops only when shutdown is latched and no one is seated; otherwise
    /// dequeues the head of the hallway.
    pub fn next_step(&self) -> Result<NextStep, InvariantViolation> {
        let mut state = self.state.lock();
        if state.progress.is_shutdown() && state.seats.is_empty() {
            return Ok(NextStep::Stop);
        }

        let (student, called) = Self::dequeue(&mut state, &self.events)?;
        drop(state);

        called.log();
        Ok(NextStep::Serve(student))
    }

    /// Remove and return the earliest seated student
    ///
    /// Callers must have consumed an arrival token first.
    pub fn pop_next(&self) -> Result<StudentId, InvariantViolation> {
        let mut state = self.state.lock();
        let (student, called) = Self::dequeue(&mut state, &self.events)?;
        drop(state);

        called.log();
        Ok(student)
    }

    /// Pop the head and forward its call event; the caller logs it after unlocking
    fn dequeue(
        state: &mut RoomState,
        events: &EventStream,
    ) -> Result<(StudentId, OfficeEvent), InvariantViolation> {
        let student = state.seats.pop_front()?;
        let event = OfficeEvent::Called {
            student,
            waiting: state.seats.occupancy(),
        };
        events.forward(event.clone());
        Ok((student, event))
    }

    /// Mark `student` as done with all requests
    ///
    /// The student that completes the set latches shutdown and posts the
    /// forced wake-up token, even though no chair was filled. Returns `true`
    /// for that student.
    pub fn finish(&self, student: StudentId) -> Result<bool, InvariantViolation> {
        let mut state = self.state.lock();
        let latched = state.progress.record_finish()?;
        let finished = OfficeEvent::StudentFinished {
            student,
            finished: state.progress.finished(),
            total: state.progress.total(),
        };
        self.events.forward(finished.clone());
        let latch = latched.then(|| OfficeEvent::ShutdownLatched {
            total: state.progress.total(),
        });
        if let Some(event) = &latch {
            self.events.forward(event.clone());
        }
        drop(state);

        finished.log();
        if let Some(event) = latch {
            event.log();
            self.arrivals.post();
        }
        Ok(latched)
    }

    /// Count students that will never run as finished
    ///
    /// Used when thread creation fails part way through startup so the
    /// students already running can still drive the TA to a clean stop.
    pub fn abandon(&self, students: impl IntoIterator<Item = StudentId>) -> Result<bool, InvariantViolation> {
        let mut latched = false;
        for student in students {
            latched |= self.finish(student)?;
        }
        Ok(latched)
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        let state = self.state.lock();
        RoomSnapshot {
            occupancy: state.seats.occupancy(),
            capacity: state.seats.capacity(),
            seated: state.seats.seated(),
            finished: state.progress.finished(),
            total: state.progress.total(),
            shutdown: state.progress.is_shutdown(),
        }
    }

    /// Verify the seat ring invariants under the lock
    pub fn check(&self) -> Result<(), InvariantViolation> {
        self.state.lock().seats.check()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.state.lock().seats.capacity()
    }

    #[inline]
    pub fn arrivals(&self) -> &ArrivalSignal {
        &self.arrivals
    }

    #[inline]
    pub fn events(&self) -> &EventStream {
        &self.events
    }

    #[inline]
    pub fn stats(&self) -> &OfficeStats {
        &self.stats
    }
}

impl std::fmt::Debug for WaitingRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitingRoom")
            .field("snapshot", &self.snapshot())
            .field("arrivals", &self.arrivals)
            .finish()
    }
}
