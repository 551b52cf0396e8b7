/*!
 * Office Session
 *
 * Builds the shared room, spawns the TA and every student, joins them all
 * and reports what happened.
 */

use super::config::OfficeConfig;
use super::coordinator::Coordinator;
use super::fail_fast;
use super::lines::ServiceLines;
use super::requester::{Requester, RequesterSummary};
use super::room::WaitingRoom;
use super::stats::StatsSnapshot;
use crate::core::errors::OfficeError;
use crate::core::limits::{STUDENT_THREAD_PREFIX, TA_THREAD_NAME};
use crate::core::types::{OfficeResult, StudentId};
use crate::monitoring::{generate_session_id, span_session, EventStream};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn, Span};

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub students: u32,
    pub requests_per_student: u32,
    pub chairs: usize,
    /// Help sessions the TA gave
    pub ta_served: u64,
    pub stats: StatsSnapshot,
    pub students_summary: BTreeMap<StudentId, RequesterSummary>,
    pub elapsed: Duration,
}

impl SessionReport {
    /// Every student got exactly the help it asked for
    pub fn is_complete(&self) -> bool {
        let expected = u64::from(self.students) * u64::from(self.requests_per_student);
        self.ta_served == expected
            && self
                .students_summary
                .values()
                .all(|s| s.served == self.requests_per_student)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Hooks around each student thread
#[derive(Clone, Copy)]
struct StudentLaunch {
    /// Consulted before the thread is created; an error counts as a spawn failure
    admit: fn(StudentId) -> io::Result<()>,
    /// First thing run on the student's own thread
    on_start: fn(StudentId),
}

impl Default for StudentLaunch {
    fn default() -> Self {
        Self {
            admit: |_| Ok(()),
            on_start: |_| {},
        }
    }
}

/// One TA, many students, one hallway
pub struct Office {
    config: OfficeConfig,
    events: EventStream,
    session_id: String,
    launch: StudentLaunch,
}

impl Office {
    /// Validate the configuration; nothing is spawned yet
    pub fn new(config: OfficeConfig) -> OfficeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            events: EventStream::discard(),
            session_id: generate_session_id(),
            launch: StudentLaunch::default(),
        })
    }

    #[cfg(test)]
    fn with_launch(mut self, launch: StudentLaunch) -> Self {
        self.launch = launch;
        self
    }

    /// Publish protocol events to `events` as well as the log
    pub fn with_events(mut self, events: EventStream) -> Self {
        self.events = events;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    /// Run to completion
    ///
    /// Returns only after every thread has been joined, including on a
    /// thread-spawn failure.
    pub fn run(self) -> OfficeResult<SessionReport> {
        let config = &self.config;
        let span = span_session(&self.session_id, config.students, config.chairs);
        let _entered = span.enter();

        info!(
            students = config.students,
            requests = config.requests_per_student,
            chairs = config.chairs,
            "Office opening"
        );

        let start = Instant::now();
        let room = WaitingRoom::new(config.chairs, config.students, self.events.clone());
        let lines = ServiceLines::new();

        let launch = self.launch;
        let (ta_served, summaries) =
            thread::scope(|scope| run_scoped(scope, config, &room, &lines, launch, &span))?;

        let report = SessionReport {
            session_id: self.session_id.clone(),
            students: config.students,
            requests_per_student: config.requests_per_student,
            chairs: config.chairs,
            ta_served,
            stats: room.stats().snapshot(),
            students_summary: summaries.into_iter().map(|s| (s.student, s)).collect(),
            elapsed: start.elapsed(),
        };

        info!(
            served = report.ta_served,
            rejections = report.stats.rejections,
            peak_waiting = report.stats.peak_occupancy,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Office closed"
        );
        Ok(report)
    }
}

fn run_scoped<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    config: &'env OfficeConfig,
    room: &'env WaitingRoom,
    lines: &'env ServiceLines,
    launch: StudentLaunch,
    span: &Span,
) -> OfficeResult<(u64, Vec<RequesterSummary>)> {
    // Nothing else is running yet, so a failure here needs no unwinding
    let ta = spawn_ta(scope, config, room, lines, span.clone())?;

    // Grows with the threads actually started
    let mut students = Vec::new();
    let mut failure = None;

    for student in 1..=config.students {
        match spawn_student(scope, config, room, lines, launch, student, span.clone()) {
            Ok(handle) => students.push((student, handle)),
            Err(err) => {
                error!(student, error = %err, "Failed to spawn student, draining office");
                lines.close(student);
                // The students already running still drive the TA to a clean stop
                if let Err(violation) = room.abandon(student..=config.students) {
                    fail_fast(violation);
                }
                failure = Some(err);
                break;
            }
        }
    }

    let mut summaries = Vec::with_capacity(students.len());
    for (student, handle) in students {
        match handle.join() {
            Ok(summary) => summaries.push(summary),
            Err(_) => {
                warn!(student, "Student thread panicked");
                if let Err(violation) = room.finish(student) {
                    fail_fast(violation);
                }
                if failure.is_none() {
                    failure = Some(OfficeError::ThreadPanicked(student_thread_name(student)));
                }
            }
        }
        lines.close(student);
    }

    let ta_served = ta
        .join()
        .map_err(|_| OfficeError::ThreadPanicked(TA_THREAD_NAME.to_string()))?;

    match failure {
        Some(err) => Err(err),
        None => Ok((ta_served, summaries)),
    }
}

fn spawn_ta<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    config: &'env OfficeConfig,
    room: &'env WaitingRoom,
    lines: &'env ServiceLines,
    span: Span,
) -> OfficeResult<ScopedJoinHandle<'scope, u64>> {
    thread::Builder::new()
        .name(TA_THREAD_NAME.to_string())
        .spawn_scoped(scope, move || {
            let _entered = span.enter();
            Coordinator::new(room, lines, &config.service)
                .run()
                .unwrap_or_else(|violation| fail_fast(violation))
        })
        .map_err(|err| OfficeError::resource(format!("thread {}", TA_THREAD_NAME), err))
}

fn spawn_student<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    config: &'env OfficeConfig,
    room: &'env WaitingRoom,
    lines: &'env ServiceLines,
    launch: StudentLaunch,
    student: StudentId,
    span: Span,
) -> OfficeResult<ScopedJoinHandle<'scope, RequesterSummary>> {
    let name = student_thread_name(student);
    (launch.admit)(student).map_err(|err| OfficeError::resource(format!("thread {}", name), err))?;
    let line = lines.open(student)?;

    thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, move || {
            let _entered = span.enter();
            (launch.on_start)(student);
            Requester::new(room, line, &config.think, config.requests_per_student)
                .run()
                .unwrap_or_else(|violation| fail_fast(violation))
        })
        .map_err(|err| OfficeError::resource(format!("thread {}", name), err))
}

fn student_thread_name(student: StudentId) -> String {
    format!("{}-{:02}", STUDENT_THREAD_PREFIX, student)
}
