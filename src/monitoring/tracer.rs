/*!
 * Structured Tracing
 * Log initialisation and run spans using the tracing crate
 *
 * Features:
 * - Session ID generation for log correlation across threads
 * - JSON-formatted logs for structured parsing
 * - Thread names in every line (`ta`, `student-01`, ...)
 */

use crate::core::limits::TRACE_JSON_ENV;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - TA_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init();
        if installed.is_ok() {
            info!("Structured tracing initialized with JSON output");
        }
    } else {
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init();
        if installed.is_ok() {
            info!("Structured tracing initialized");
        }
    }
}

/// Generate a unique session ID for one office run
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one whole office run
pub fn span_session(session_id: &str, students: u32, chairs: usize) -> Span {
    info_span!("office", session_id = %session_id, students, chairs)
}
