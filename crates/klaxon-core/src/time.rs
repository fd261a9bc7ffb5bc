//! Wall-clock access and execution windows
//!
//! Instrumentation reads time through [`Clock`] so tests can substitute a
//! [`ManualClock`] and get deterministic windows.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Source of wall-clock timestamps
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for deterministic tests
///
/// Each call to `now` returns the current instant and then advances it by the
/// configured step (zero by default).
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualClockState>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    step: Duration,
}

impl ManualClock {
    /// Freeze the clock at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(ManualClockState {
                now: start,
                step: Duration::zero(),
            }),
        }
    }

    /// Advance automatically by `step` after every read
    pub fn with_step(self, step: Duration) -> Self {
        self.state.lock().step = step;
        self
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        self.state.lock().now = instant;
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        self.state.lock().now += duration;
    }

    /// Current instant without advancing
    pub fn peek(&self) -> DateTime<Utc> {
        self.state.lock().now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut state = self.state.lock();
        let now = state.now;
        state.now = now + state.step;
        now
    }
}

/// When an operation ran: `started_at <= finished_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionWindow {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl ExecutionWindow {
    /// Build a window from two clock reads
    ///
    /// A wall clock can step backwards between reads; the end is clamped to the
    /// start so the window is always ordered.
    pub fn capture(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: finished_at.max(started_at),
        }
    }

    /// Start of the operation
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// End of the operation
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Time spent in the operation
    pub fn elapsed(&self) -> Duration {
        self.finished_at - self.started_at
    }
}
