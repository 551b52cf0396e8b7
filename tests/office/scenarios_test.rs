/*!
 * Office Scenario Tests
 * End-to-end runs with real TA and student threads
 */

use super::support::*;
use pretty_assertions::assert_eq;
use sleeping_ta::{DelayPolicy, OfficeConfig, OfficeEvent};
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(30);

#[test]
fn test_three_chairs_five_students_one_request() {
    let (report, events) = run_with_deadline(OfficeConfig::instant(5, 1, 3), DEADLINE);

    assert_protocol(&events, 3, 5, 1);
    assert_eq!(report.ta_served, 5);
    assert!(report.is_complete());

    let services: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, OfficeEvent::ServiceStarted { .. }))
        .filter_map(OfficeEvent::student)
        .collect();
    let mut sorted = services.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_one_chair_two_students_take_turns() {
    let config = OfficeConfig::builder()
        .students(2)
        .requests_per_student(2)
        .chairs(1)
        .think(DelayPolicy::uniform(Duration::ZERO, Duration::from_millis(2)))
        .service(DelayPolicy::Fixed(Duration::from_millis(3)))
        .build()
        .unwrap();

    let (report, events) = run_with_deadline(config, DEADLINE);

    // Replay also proves every rejection happened while the chair was taken
    assert_protocol(&events, 1, 2, 2);
    assert_eq!(report.stats.peak_occupancy, 1);
    assert_eq!(report.ta_served, 4);
    for summary in report.students_summary.values() {
        assert_eq!(summary.served, 2);
    }
}

#[test]
fn test_single_student_three_requests() {
    let (report, events) = run_with_deadline(OfficeConfig::instant(1, 3, 2), DEADLINE);

    assert_protocol(&events, 2, 1, 3);

    // Alone in the hallway: every admission finds the room empty
    let waiting: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            OfficeEvent::Admitted { waiting, .. } => Some(*waiting),
            _ => None,
        })
        .collect();
    assert_eq!(waiting, vec![1, 1, 1]);
    assert_eq!(report.stats.rejections, 0);
    assert!(matches!(events.last(), Some(OfficeEvent::TaStopped { served: 3 })));
}

#[test]
fn test_crowded_hallway_stress() {
    let config = OfficeConfig::builder()
        .students(24)
        .requests_per_student(6)
        .chairs(3)
        .think(DelayPolicy::uniform(Duration::ZERO, Duration::from_micros(300)))
        .service(DelayPolicy::uniform(Duration::ZERO, Duration::from_micros(100)))
        .build()
        .unwrap();

    let (report, events) = run_with_deadline(config, DEADLINE);

    assert_protocol(&events, 3, 24, 6);
    assert!(report.is_complete());
    assert!(report.stats.peak_occupancy <= 3);
    assert_eq!(report.stats.admissions, 24 * 6);
}

#[test]
fn test_repeated_small_runs_never_hang() {
    for chairs in 1..=3 {
        for students in 1..=4 {
            let (report, events) =
                run_with_deadline(OfficeConfig::instant(students, 2, chairs), DEADLINE);
            assert_protocol(&events, chairs, students, 2);
            assert!(report.is_complete());
        }
    }
}
