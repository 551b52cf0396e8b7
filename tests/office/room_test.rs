/*!
 * Waiting Room Tests
 * Admission, FIFO dequeue and capacity under concurrent callers
 */

use pretty_assertions::assert_eq;
use sleeping_ta::office::{Admission, HelpRequest, NextStep, WaitingRoom};
use sleeping_ta::{EventStream, OfficeEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn test_seated_student_blocks_second_on_single_chair() {
    let room = WaitingRoom::new(1, 2, EventStream::discard());

    assert_eq!(room.try_enter(HelpRequest::new(1, 1, 2)), Admission::Admitted(0));
    assert_eq!(room.try_enter(HelpRequest::new(2, 1, 2)), Admission::Rejected);

    room.wait_for_arrival();
    assert_eq!(room.next_step(), Ok(NextStep::Serve(1)));

    // Chair vacated: the other student now gets it
    assert_eq!(room.try_enter(HelpRequest::new(2, 1, 2)), Admission::Admitted(0));
}

#[test]
fn test_concurrent_admissions_served_in_admission_order() {
    const STUDENTS: u32 = 16;
    const ROUNDS: u32 = 50;

    let (stream, subscriber) = EventStream::channel();
    let room = WaitingRoom::new(4, STUDENTS, stream);
    let producers_done = AtomicBool::new(false);

    let popped = thread::scope(|scope| {
        let consumer = scope.spawn(|| {
            let mut popped = Vec::new();
            loop {
                if room.arrivals().try_wait() {
                    popped.push(room.pop_next().expect("token implies a seated student"));
                    assert!(room.check().is_ok());
                } else if producers_done.load(Ordering::Acquire) && room.arrivals().available() == 0 {
                    break;
                } else {
                    thread::yield_now();
                }
            }
            popped
        });

        let producers: Vec<_> = (1..=STUDENTS)
            .map(|student| {
                let room = &room;
                scope.spawn(move || {
                    let mut admitted = 0;
                    while admitted < ROUNDS {
                        match room.try_enter(HelpRequest::new(student, admitted + 1, ROUNDS)) {
                            Admission::Admitted(_) => admitted += 1,
                            Admission::Rejected => thread::yield_now(),
                        }
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        producers_done.store(true, Ordering::Release);
        consumer.join().unwrap()
    });

    let events = subscriber.drain();
    let admitted: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            OfficeEvent::Admitted { student, waiting, .. } => {
                assert!(*waiting <= 4);
                Some(*student)
            }
            _ => None,
        })
        .collect();

    assert_eq!(popped.len(), (STUDENTS * ROUNDS) as usize);
    assert_eq!(popped, admitted);
    assert_eq!(room.snapshot().occupancy, 0);
}

#[test]
fn test_stats_match_events() {
    let (stream, subscriber) = EventStream::channel();
    let room = WaitingRoom::new(2, 3, stream);

    for student in 1..=3 {
        room.try_enter(HelpRequest::new(student, 1, 1));
    }

    let stats = room.stats().snapshot();
    let events = subscriber.drain();
    assert_eq!(stats.admissions, 2);
    assert_eq!(stats.rejections, 1);
    assert_eq!(stats.peak_occupancy, 2);
    assert_eq!(events.len(), 3);
    assert!(matches!(events[2], OfficeEvent::Rejected { student: 3, .. }));
}
