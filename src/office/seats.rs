/*!
 * Seat Ring
 * Fixed-capacity FIFO of seated students with explicit modulo indexing
 */

use crate::core::errors::InvariantViolation;
use crate::core::types::{SeatIndex, StudentId};

/// Outcome of a seat request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Seated at the given chair
    Admitted(SeatIndex),
    /// Every chair was taken at the instant of the request
    Rejected,
}

impl Admission {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted(_))
    }
}

/// Ring buffer of chairs
///
/// `head` is the earliest still-seated student whenever `occupancy > 0`;
/// `tail` is the next chair to fill. Not synchronized on its own: the
/// waiting room owns it behind its lock.
#[derive(Debug, Clone)]
pub struct SeatRing {
    seats: Box<[Option<StudentId>]>,
    head: usize,
    tail: usize,
    occupancy: usize,
}

impl SeatRing {
    /// Create a ring with `capacity` empty chairs
    ///
    /// Capacity is validated by the office configuration before this is
    /// ever reached; a zero-capacity ring simply rejects everyone.
    pub fn new(capacity: usize) -> Self {
        Self {
            seats: vec![None; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            occupancy: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    #[inline]
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupancy == self.capacity()
    }

    /// Seat `student` at the tail, or reject if the ring is full
    pub fn try_seat(&mut self, student: StudentId) -> Admission {
        if self.is_full() {
            return Admission::Rejected;
        }

        let seat = self.tail;
        debug_assert!(self.seats[seat].is_none(), "tail chair already occupied");
        self.seats[seat] = Some(student);
        self.tail = (self.tail + 1) % self.capacity();
        self.occupancy += 1;
        Admission::Admitted(seat)
    }

    /// Remove and return the student at the head
    pub fn pop_front(&mut self) -> Result<StudentId, InvariantViolation> {
        if self.occupancy == 0 {
            return Err(InvariantViolation::EmptyRoom);
        }

        let student = self.seats[self.head]
            .take()
            .ok_or(InvariantViolation::OccupancyOutOfRange {
                occupancy: self.occupancy,
                capacity: self.capacity(),
            })?;
        self.head = (self.head + 1) % self.capacity();
        self.occupancy -= 1;
        Ok(student)
    }

    /// Student at the head without removing it
    pub fn peek(&self) -> Option<StudentId> {
        if self.occupancy == 0 {
            None
        } else {
            self.seats[self.head]
        }
    }

    /// Seated students in service order
    pub fn seated(&self) -> Vec<StudentId> {
        (0..self.occupancy)
            .filter_map(|offset| self.seats[(self.head + offset) % self.capacity()])
            .collect()
    }

    /// Verify `occupancy` matches the non-empty chairs and stays in range
    pub fn check(&self) -> Result<(), InvariantViolation> {
        let filled = self.seats.iter().filter(|s| s.is_some()).count();
        if self.occupancy > self.capacity() || filled != self.occupancy {
            return Err(InvariantViolation::OccupancyOutOfRange {
                occupancy: self.occupancy,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}
