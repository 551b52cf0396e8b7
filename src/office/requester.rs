/*!
 * Requester (Student) Loop
 *
 * Program, try for a chair, back off when the hallway is full, and wait to
 * be called in and released when seated. The last student to finish closes
 * the office.
 */

use super::lines::StudentLine;
use super::pacing::Pacing;
use super::room::{HelpRequest, WaitingRoom};
use super::seats::Admission;
use crate::core::errors::InvariantViolation;
use crate::core::types::{RequestNo, SeatIndex, StudentId};
use serde::{Deserialize, Serialize};

/// Student state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterState {
    Thinking,
    RequestingEntry,
    AwaitingCall,
    InService,
    Finished,
}

/// What one student went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterSummary {
    pub student: StudentId,
    pub served: u32,
    pub rejections: u32,
    /// This student latched shutdown
    pub closed_office: bool,
}

/// One student
pub struct Requester<'a> {
    room: &'a WaitingRoom,
    line: StudentLine,
    think: &'a dyn Pacing,
    requests: RequestNo,
    state: RequesterState,
    served: u32,
    rejections: u32,
}

impl<'a> Requester<'a> {
    pub fn new(room: &'a WaitingRoom, line: StudentLine, think: &'a dyn Pacing, requests: RequestNo) -> Self {
        Self {
            room,
            line,
            think,
            requests,
            state: RequesterState::Thinking,
            served: 0,
            rejections: 0,
        }
    }

    #[inline]
    pub fn student(&self) -> StudentId {
        self.line.student()
    }

    #[inline]
    pub fn state(&self) -> RequesterState {
        self.state
    }

    /// Complete every help request, then report completion to the room
    pub fn run(mut self) -> Result<RequesterSummary, InvariantViolation> {
        let student = self.student();
        for number in 1..=self.requests {
            self.obtain_help(HelpRequest::new(student, number, self.requests))?;
        }

        self.state = RequesterState::Finished;
        let closed_office = self.room.finish(student)?;

        Ok(RequesterSummary {
            student,
            served: self.served,
            rejections: self.rejections,
            closed_office,
        })
    }

    /// One admission cycle; a rejected attempt costs a full think period
    fn obtain_help(&mut self, request: HelpRequest) -> Result<SeatIndex, InvariantViolation> {
        let seat = loop {
            self.state = RequesterState::Thinking;
            self.think.pause();

            self.state = RequesterState::RequestingEntry;
            match self.room.try_enter(request) {
                Admission::Admitted(seat) => break seat,
                Admission::Rejected => self.rejections += 1,
            }
        };

        self.state = RequesterState::AwaitingCall;
        self.line.await_call()?;

        self.state = RequesterState::InService;
        self.line.await_served()?;

        self.served += 1;
        self.state = RequesterState::Thinking;
        Ok(seat)
    }
}
