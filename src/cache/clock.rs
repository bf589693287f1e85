//! Time source used for access timestamps and recency

use chrono::{DateTime, Local, Timelike, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of the current wall-clock time
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Local hour of day for `now`, used as the default time hint
    fn hour_of(&self, now: DateTime<Utc>) -> f64 {
        now.with_timezone(&Local).hour() as f64
    }
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic recency
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to the cache.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    /// Move forward by `step`
    pub fn advance(&self, step: Duration) {
        let step = chrono::Duration::from_std(step).unwrap_or(chrono::Duration::zero());
        self.now.set(self.now.get() + step);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Seconds elapsed from `since` to `now`, never negative
pub fn seconds_between(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since)
        .to_std()
        .unwrap_or(Duration::from_secs(0))
        .as_secs_f64()
}
