/*!
 * Service Lines
 * Per-student one-shot "called" / "served" rendezvous pairs
 *
 * Each student owns the receiving halves of two single-slot channels; the
 * TA reaches the sending halves through a map keyed by student id. A slot
 * that is still full when the TA posts again means the same signal was sent
 * twice in one cycle.
 */

use crate::core::errors::{InvariantViolation, SignalKind};
use crate::core::types::StudentId;
use ahash::RandomState;
use dashmap::DashMap;
use flume::{Receiver, Sender, TrySendError};

/// TA-side halves of one student's pair
#[derive(Clone)]
struct TaEnd {
    called: Sender<()>,
    served: Sender<()>,
}

impl TaEnd {
    fn sender(&self, kind: SignalKind) -> &Sender<()> {
        match kind {
            SignalKind::Called => &self.called,
            SignalKind::Served => &self.served,
        }
    }
}

/// Student-side halves, moved into the student's thread
#[derive(Debug)]
pub struct StudentLine {
    student: StudentId,
    called: Receiver<()>,
    served: Receiver<()>,
}

impl StudentLine {
    #[inline]
    pub fn student(&self) -> StudentId {
        self.student
    }

    /// Block until the TA calls this student in
    pub fn await_call(&self) -> Result<(), InvariantViolation> {
        self.await_signal(SignalKind::Called)
    }

    /// Block until the TA releases this student
    pub fn await_served(&self) -> Result<(), InvariantViolation> {
        self.await_signal(SignalKind::Served)
    }

    fn await_signal(&self, kind: SignalKind) -> Result<(), InvariantViolation> {
        let receiver = match kind {
            SignalKind::Called => &self.called,
            SignalKind::Served => &self.served,
        };
        receiver.recv().map_err(|_| InvariantViolation::LineClosed {
            student: self.student,
            signal: kind,
        })
    }

    /// Signals posted but not yet consumed (for diagnostics)
    pub fn pending(&self) -> (usize, usize) {
        (self.called.len(), self.served.len())
    }
}

/// Registry of every open service line
pub struct ServiceLines {
    lines: DashMap<StudentId, TaEnd, RandomState>,
}

impl ServiceLines {
    pub fn new() -> Self {
        Self {
            lines: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Open the line for a student about to be spawned
    pub fn open(&self, student: StudentId) -> Result<StudentLine, InvariantViolation> {
        if self.lines.contains_key(&student) {
            return Err(InvariantViolation::DuplicateStudent(student));
        }

        let (called_tx, called_rx) = flume::bounded(1);
        let (served_tx, served_rx) = flume::bounded(1);
        self.lines.insert(
            student,
            TaEnd {
                called: called_tx,
                served: served_tx,
            },
        );

        Ok(StudentLine {
            student,
            called: called_rx,
            served: served_rx,
        })
    }

    /// Release the line of a joined student
    pub fn close(&self, student: StudentId) -> bool {
        self.lines.remove(&student).is_some()
    }

    /// Invite `student` into the office
    pub fn call(&self, student: StudentId) -> Result<(), InvariantViolation> {
        self.post(student, SignalKind::Called)
    }

    /// Release `student` after helping
    pub fn serve(&self, student: StudentId) -> Result<(), InvariantViolation> {
        self.post(student, SignalKind::Served)
    }

    fn post(&self, student: StudentId, kind: SignalKind) -> Result<(), InvariantViolation> {
        // Clone out so the map shard is not held while sending
        let end = self
            .lines
            .get(&student)
            .map(|entry| entry.value().clone())
            .ok_or(InvariantViolation::UnknownStudent(student))?;

        end.sender(kind).try_send(()).map_err(|err| match err {
            TrySendError::Full(()) => InvariantViolation::DoubleSignal {
                student,
                signal: kind,
            },
            TrySendError::Disconnected(()) => InvariantViolation::LineClosed {
                student,
                signal: kind,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for ServiceLines {
    fn default() -> Self {
        Self::new()
    }
}
