/*!
 * Monitoring
 * Structured logging and the ordered office event stream
 */

pub mod events;
pub mod streaming;
mod tracer;

pub use events::{Category, OfficeEvent};
pub use streaming::{EventStream, EventSubscriber, StreamStats};
pub use tracer::{generate_session_id, init_tracing, span_session};
