/*!
 * Coordinator (TA) Loop
 *
 * Sleeps on the arrival signal, helps seated students one at a time in
 * admission order, and goes home once every student has finished and the
 * hallway is empty.
 */

use super::lines::ServiceLines;
use super::pacing::Pacing;
use super::room::{NextStep, WaitingRoom};
use crate::core::errors::InvariantViolation;
use crate::core::types::StudentId;
use crate::monitoring::OfficeEvent;
use std::thread;

/// TA state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Blocked on the arrival signal
    Idle,
    /// Helping this student
    Serving(StudentId),
    /// Terminal
    Stopped,
}

/// The single consumer of the waiting room
pub struct Coordinator<'a> {
    room: &'a WaitingRoom,
    lines: &'a ServiceLines,
    service: &'a dyn Pacing,
    state: CoordinatorState,
    served: u64,
}

impl<'a> Coordinator<'a> {
    pub fn new(room: &'a WaitingRoom, lines: &'a ServiceLines, service: &'a dyn Pacing) -> Self {
        Self {
            room,
            lines,
            service,
            state: CoordinatorState::Idle,
            served: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    #[inline]
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Run until `Stopped`; returns how many help sessions were given
    pub fn run(mut self) -> Result<u64, InvariantViolation> {
        while self.step()? != CoordinatorState::Stopped {}
        Ok(self.served)
    }

    /// One wake: either serve the head of the hallway or stop
    ///
    /// Calling this after `Stopped` is a no-op.
    pub fn step(&mut self) -> Result<CoordinatorState, InvariantViolation> {
        if self.state == CoordinatorState::Stopped {
            return Ok(self.state);
        }

        self.room.wait_for_arrival();

        match self.room.next_step()? {
            NextStep::Stop => {
                self.state = CoordinatorState::Stopped;
                self.room.events().publish(OfficeEvent::TaStopped {
                    served: self.served,
                });
            }
            NextStep::Serve(student) => {
                self.state = CoordinatorState::Serving(student);
                self.serve(student)?;
                self.state = CoordinatorState::Idle;
            }
        }
        Ok(self.state)
    }

    fn serve(&mut self, student: StudentId) -> Result<(), InvariantViolation> {
        self.lines.call(student)?;

        let duration = self.service.delay();
        self.room.events().publish(OfficeEvent::ServiceStarted {
            student,
            duration_ms: duration.as_millis() as u64,
        });
        if !duration.is_zero() {
            thread::sleep(duration);
        }

        self.served += 1;
        self.room.stats().record_service();
        self.room.events().publish(OfficeEvent::ServiceEnded { student });

        self.lines.serve(student)
    }
}
