//! Focus mode: a temporary range counting down to one task.

use serde::{Deserialize, Serialize};

use crate::clock::{TimeOfDay, TimeRange};
use crate::task::TaskId;

/// Progress at which focus on a task counts as complete.
pub const AUTO_EXIT_PROGRESS: f64 = 0.99;

/// Replaces the configured range with `[entered_at, task.time)` until exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusOverride {
    /// The configured range to restore on exit.
    pub saved_range: TimeRange,
    pub active_range: TimeRange,
    pub task_id: TaskId,
}

impl FocusOverride {
    pub fn new(saved_range: TimeRange, now: TimeOfDay, task_id: TaskId, target: TimeOfDay) -> Self {
        Self {
            saved_range,
            active_range: TimeRange::new(now, target),
            task_id,
        }
    }

    pub fn is_complete(&self, now: TimeOfDay) -> bool {
        self.active_range.progress(now) >= AUTO_EXIT_PROGRESS
    }
}
