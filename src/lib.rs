/*!
 * Sleeping TA
 * Bounded-capacity rendezvous between one TA thread and many student threads
 */

pub mod core;
pub mod monitoring;
pub mod office;

// Re-exports
pub use crate::core::errors::{ConfigError, InvariantViolation, OfficeError, SignalKind};
pub use crate::core::types::{OfficeResult, StudentId};
pub use monitoring::{init_tracing, EventStream, EventSubscriber, OfficeEvent};
pub use office::{DelayPolicy, Office, OfficeConfig, SessionReport};
