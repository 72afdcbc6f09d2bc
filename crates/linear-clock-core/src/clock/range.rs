//! Time range and progress mapping.
//!
//! A [`TimeRange`] maps a wall-clock window onto `[0, 1]`. A range whose end
//! is not after its start wraps past midnight; `start == end` covers the
//! whole day.
//!
//! ```text
//! [09:00 ---------- 13:00 ---------- 17:00]    0.0 .. 0.5 .. 1.0
//! [22:00 -- 00:00 -- 02:00 -------- 06:00]     wraps midnight
//! ```

use serde::{Deserialize, Serialize};

use super::time_of_day::{TimeOfDay, SECONDS_PER_DAY};

/// A `[start, end)` wall-clock window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// A consistent view of where `now` sits in a range.
///
/// Rendering and notification checks both read from one snapshot so a task
/// marker never appears ahead of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeInfo {
    pub progress: f64,
    /// Range length in seconds.
    pub duration: u32,
    /// Seconds from range start to `now`, clamped to `duration`.
    pub elapsed: u32,
    pub in_range: bool,
}

impl Default for TimeRange {
    /// The whole day, `00:00:00` to `23:59:59`.
    fn default() -> Self {
        Self {
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::LAST_SECOND,
        }
    }
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Whether the range crosses midnight. `start == end` counts as wrapping.
    pub fn is_wrapping(&self) -> bool {
        self.end.seconds() <= self.start.seconds()
    }

    /// Length in seconds, always in `1..=86400`.
    pub fn duration(&self) -> u32 {
        let (start, end) = (self.start.seconds(), self.end.seconds());
        if end > start {
            end - start
        } else {
            SECONDS_PER_DAY - start + end
        }
    }

    /// Inclusive membership test at both ends.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        let (start, end, t) = (self.start.seconds(), self.end.seconds(), t.seconds());
        if self.is_wrapping() {
            t >= start || t <= end
        } else {
            start <= t && t <= end
        }
    }

    /// Seconds from `start` to `t`, clamped into `[0, duration]`.
    pub fn elapsed(&self, t: TimeOfDay) -> u32 {
        let (start, t) = (self.start.seconds(), t.seconds());
        let raw = if t >= start {
            t - start
        } else if self.is_wrapping() {
            SECONDS_PER_DAY - start + t
        } else {
            0
        };
        raw.min(self.duration())
    }

    /// Normalized position of `t`, clamped to `[0, 1]`.
    pub fn progress(&self, t: TimeOfDay) -> f64 {
        let duration = self.duration();
        if duration == 0 {
            return 0.0;
        }
        (self.elapsed(t) as f64 / duration as f64).clamp(0.0, 1.0)
    }

    /// Inverse of [`TimeRange::progress`], quantized to whole seconds.
    pub fn time_at(&self, progress: f64) -> TimeOfDay {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let offset = (p * self.duration() as f64).round() as u32;
        TimeOfDay::from_seconds(self.start.seconds() + offset)
    }

    pub fn info(&self, now: TimeOfDay) -> RangeInfo {
        RangeInfo {
            progress: self.progress(now),
            duration: self.duration(),
            elapsed: self.elapsed(now),
            in_range: self.contains(now),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
