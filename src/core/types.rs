/*!
 * Core Types
 * Common types used across the office
 */

/// Student (requester) identifier, 1-based like the hallway log
pub type StudentId = u32;

/// Seat index inside the waiting room, always in `[0, capacity)`
pub type SeatIndex = usize;

/// Request number within one student's run (1-based)
pub type RequestNo = u32;

/// Common result type for office operations
pub type OfficeResult<T> = Result<T, super::errors::OfficeError>;
