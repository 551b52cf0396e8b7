/*!
 * Observability Tests
 * Tracing initialisation, event serialisation and the session report
 */

use super::support::run_with_deadline;
use serial_test::serial;
use sleeping_ta::monitoring::Category;
use sleeping_ta::{init_tracing, OfficeConfig, OfficeEvent, SessionReport};
use std::time::Duration;

#[test]
#[serial]
fn test_run_with_tracing_installed() {
    init_tracing();
    let (report, events) = run_with_deadline(OfficeConfig::instant(3, 2, 2), Duration::from_secs(30));
    assert!(report.is_complete());
    assert!(events.iter().any(|e| e.category() == Category::Lifecycle));
}

#[test]
#[serial]
fn test_report_round_trips_through_json() {
    let (report, _) = run_with_deadline(OfficeConfig::instant(2, 1, 1), Duration::from_secs(30));
    let json = report.to_json().unwrap();
    let back: SessionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert_eq!(back.session_id.len(), 36);
}

#[test]
fn test_event_stream_serialises_as_ndjson() {
    let events = vec![
        OfficeEvent::ShutdownLatched { total: 2 },
        OfficeEvent::TaStopped { served: 4 },
    ];
    let lines: Vec<String> = events
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            r#"{"event":"shutdown_latched","total":2}"#.to_string(),
            r#"{"event":"ta_stopped","served":4}"#.to_string(),
        ]
    );
}
