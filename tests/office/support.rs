/*!
 * Shared helpers for office integration tests
 */

use sleeping_ta::{EventStream, Office, OfficeConfig, OfficeEvent, SessionReport, StudentId};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

/// Event kind without payload, for sequence comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Admitted,
    Rejected,
    Called,
    ServiceStarted,
    ServiceEnded,
    Finished,
}

pub fn kind(event: &OfficeEvent) -> Option<Kind> {
    match event {
        OfficeEvent::Admitted { .. } => Some(Kind::Admitted),
        OfficeEvent::Rejected { .. } => Some(Kind::Rejected),
        OfficeEvent::Called { .. } => Some(Kind::Called),
        OfficeEvent::ServiceStarted { .. } => Some(Kind::ServiceStarted),
        OfficeEvent::ServiceEnded { .. } => Some(Kind::ServiceEnded),
        OfficeEvent::StudentFinished { .. } => Some(Kind::Finished),
        OfficeEvent::ShutdownLatched { .. } | OfficeEvent::TaStopped { .. } => None,
    }
}

/// Run an office on a helper thread and fail the test if it does not finish
pub fn run_with_deadline(config: OfficeConfig, deadline: Duration) -> (SessionReport, Vec<OfficeEvent>) {
    let (stream, subscriber) = EventStream::channel();
    let office = Office::new(config).expect("valid config").with_events(stream);

    let (done_tx, done_rx) = flume::bounded(1);
    thread::spawn(move || {
        let report = office.run();
        let _ = done_tx.send(report);
    });

    let report = done_rx
        .recv_timeout(deadline)
        .expect("office did not close before the deadline")
        .expect("office run failed");

    (report, subscriber.drain())
}

/// Per-student event kinds, in stream order
pub fn by_student(events: &[OfficeEvent]) -> BTreeMap<StudentId, Vec<Kind>> {
    let mut map: BTreeMap<StudentId, Vec<Kind>> = BTreeMap::new();
    for event in events {
        if let (Some(student), Some(kind)) = (event.student(), kind(event)) {
            map.entry(student).or_default().push(kind);
        }
    }
    map
}

/// Check every protocol property that can be read back from the stream
///
/// Admission, rejection and dequeue events are published under the room
/// lock, so replaying them reproduces the exact occupancy history.
pub fn assert_protocol(events: &[OfficeEvent], capacity: usize, students: u32, requests: u32) {
    let mut occupancy = 0usize;
    let mut admitted = Vec::new();
    let mut called = Vec::new();
    let mut latched_at = None;

    for (index, event) in events.iter().enumerate() {
        match *event {
            OfficeEvent::Admitted {
                student,
                waiting,
                capacity: cap,
                ..
            } => {
                assert!(latched_at.is_none(), "admission after shutdown");
                assert_eq!(cap, capacity);
                occupancy += 1;
                assert!(occupancy <= capacity, "occupancy {} over capacity", occupancy);
                assert_eq!(waiting, occupancy);
                admitted.push(student);
            }
            OfficeEvent::Rejected { .. } => {
                assert_eq!(occupancy, capacity, "rejected while a chair was free");
            }
            OfficeEvent::Called { student, waiting } => {
                assert!(occupancy > 0, "dequeue from empty room");
                occupancy -= 1;
                assert_eq!(waiting, occupancy);
                called.push(student);
            }
            OfficeEvent::ShutdownLatched { total } => {
                assert_eq!(total, students);
                assert!(latched_at.is_none(), "shutdown latched twice");
                latched_at = Some(index);
            }
            OfficeEvent::TaStopped { served } => {
                assert_eq!(occupancy, 0, "TA stopped with students seated");
                assert!(latched_at.is_some(), "TA stopped before shutdown");
                assert_eq!(index, events.len() - 1, "TaStopped must be the last event");
                assert_eq!(served, u64::from(students) * u64::from(requests));
            }
            _ => {}
        }
    }

    // Service order is admission order
    assert_eq!(admitted, called);
    assert_eq!(admitted.len(), (students * requests) as usize);

    let per_student = by_student(events);
    assert_eq!(per_student.len(), students as usize);
    for (student, kinds) in per_student {
        assert_student_cycles(student, &kinds, requests);
    }
}

/// `(Rejected* Admitted Called ServiceStarted ServiceEnded){requests} Finished`
pub fn assert_student_cycles(student: StudentId, kinds: &[Kind], requests: u32) {
    let mut rest = kinds;
    for cycle in 1..=requests {
        while rest.first() == Some(&Kind::Rejected) {
            rest = &rest[1..];
        }
        assert!(
            rest.len() >= 4,
            "student {} cycle {} truncated: {:?}",
            student,
            cycle,
            kinds
        );
        assert_eq!(
            &rest[..4],
            &[
                Kind::Admitted,
                Kind::Called,
                Kind::ServiceStarted,
                Kind::ServiceEnded
            ],
            "student {} cycle {} out of order",
            student,
            cycle
        );
        rest = &rest[4..];
    }
    assert_eq!(rest, &[Kind::Finished], "student {} did not finish cleanly", student);
}
