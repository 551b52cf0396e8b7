/*!
 * Shutdown Tests
 * Forced wake-up, exactly-once latch and no early stop
 */

use sleeping_ta::office::{
    Coordinator, CoordinatorState, DelayPolicy, HelpRequest, ServiceLines, WaitingRoom,
};
use sleeping_ta::{EventStream, InvariantViolation, OfficeEvent};
use std::thread;
use std::time::Duration;

#[test]
fn test_idle_ta_wakes_on_last_finish() {
    let room = WaitingRoom::new(2, 3, EventStream::discard());
    let lines = ServiceLines::new();
    let service = DelayPolicy::None;
    let (done_tx, done_rx) = flume::bounded(1);

    thread::scope(|scope| {
        scope.spawn(|| {
            let served = Coordinator::new(&room, &lines, &service).run();
            done_tx.send(served).unwrap();
        });

        // Wait until the TA is asleep with no tokens banked
        while room.arrivals().waiter_count() == 0 {
            thread::yield_now();
        }
        assert_eq!(room.arrivals().available(), 0);

        assert_eq!(room.finish(1), Ok(false));
        assert_eq!(room.finish(2), Ok(false));
        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());

        assert_eq!(room.finish(3), Ok(true));
        let served = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("TA never observed shutdown");
        assert_eq!(served, Ok(0));
    });
}

#[test]
fn test_latch_set_exactly_once() {
    let (stream, subscriber) = EventStream::channel();
    let room = WaitingRoom::new(1, 8, stream);

    let latched: usize = thread::scope(|scope| {
        let handles: Vec<_> = (1..=8)
            .map(|student| {
                let room = &room;
                scope.spawn(move || room.finish(student).unwrap())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|latched| *latched)
            .count()
    });

    assert_eq!(latched, 1);
    assert_eq!(room.arrivals().available(), 1);
    let latches = subscriber
        .drain()
        .into_iter()
        .filter(|e| matches!(e, OfficeEvent::ShutdownLatched { total: 8 }))
        .count();
    assert_eq!(latches, 1);

    assert_eq!(
        room.finish(9),
        Err(InvariantViolation::FinishedOverflow {
            finished: 9,
            total: 8
        })
    );
}

#[test]
fn test_seated_student_served_before_stop() {
    let room = WaitingRoom::new(2, 2, EventStream::discard());
    let lines = ServiceLines::new();
    let line = lines.open(1).unwrap();
    let service = DelayPolicy::None;
    let mut ta = Coordinator::new(&room, &lines, &service);

    room.try_enter(HelpRequest::new(1, 1, 1));
    // Latch while student 1 still sits in the hallway
    room.abandon([2, 1]).unwrap();
    assert_eq!(room.arrivals().available(), 2);

    assert_eq!(ta.step(), Ok(CoordinatorState::Idle));
    line.await_call().unwrap();
    line.await_served().unwrap();
    assert_eq!(ta.step(), Ok(CoordinatorState::Stopped));
    assert_eq!(ta.served(), 1);
}
