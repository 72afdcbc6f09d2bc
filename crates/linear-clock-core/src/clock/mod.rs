mod range;
mod time_of_day;

pub use range::{RangeInfo, TimeRange};
pub use time_of_day::{TimeOfDay, SECONDS_PER_DAY};

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give the
/// other to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}
