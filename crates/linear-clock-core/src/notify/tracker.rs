//! Per-session task notification tracking.
//!
//! Each task is either armed (not yet notified this session) or fired. A
//! tick fires an armed task when both the task and `now` lie in the active
//! range and their progress values are within one tick of each other.
//!
//! ## Session lifecycle
//!
//! ```text
//! reset(range, now, tasks)  -- tasks behind an in-range `now` start fired
//!   check(...) * n          -- armed -> fired, at most once per task
//! reset(...)                -- range change, focus transition, new day
//! ```

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::{TimeOfDay, TimeRange};
use crate::task::{Task, TaskId};

/// Tolerance used if a range ever reported zero length.
pub const FALLBACK_TOLERANCE: f64 = 0.001;

/// Absorbs float error when comparing progress differences to one tick.
const FLOAT_SLACK: f64 = 1e-9;

/// How far behind `now` a task may be and still fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TolerancePolicy {
    /// One second's worth of progress either side, assuming ~1 Hz ticks.
    /// A tick delayed by more than a second can miss a task.
    #[default]
    Fixed,
    /// Widen the backward window to the measured gap since the previous
    /// tick, so tasks crossed during a stall or sleep still fire.
    TickDelta,
}

/// A task that just crossed `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNotification {
    pub task_id: TaskId,
    pub name: String,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationTracker {
    policy: TolerancePolicy,
    fired: HashSet<TaskId>,
    last_tick: Option<NaiveDateTime>,
}

/// One tick's worth of progress for `range`.
pub fn tick_tolerance(range: &TimeRange) -> f64 {
    match range.duration() {
        0 => FALLBACK_TOLERANCE,
        d => 1.0 / d as f64,
    }
}

impl NotificationTracker {
    pub fn new(policy: TolerancePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> TolerancePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: TolerancePolicy) {
        self.policy = policy;
    }

    pub fn is_fired(&self, id: &str) -> bool {
        self.fired.contains(id)
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    /// Start a new session: every task behind `now` counts as already
    /// notified, everything else is armed. Outside the range nothing has
    /// passed yet, so every task is armed.
    pub fn reset<'a>(
        &mut self,
        range: &TimeRange,
        now: TimeOfDay,
        tasks: impl IntoIterator<Item = &'a Task>,
    ) {
        self.fired.clear();
        self.last_tick = None;
        for task in tasks {
            self.seed(range, now, task);
        }
        tracing::debug!(
            range = %range,
            pre_fired = self.fired.len(),
            "notification session reset"
        );
    }

    /// Seed a single task added or re-timed mid-session.
    pub fn seed(&mut self, range: &TimeRange, now: TimeOfDay, task: &Task) {
        if range.contains(now) && range.progress(task.time) < range.progress(now) {
            self.fired.insert(task.id.clone());
        } else {
            self.fired.remove(&task.id);
        }
    }

    pub fn forget(&mut self, id: &str) {
        self.fired.remove(id);
    }

    /// Fire every armed task that `now` has just reached.
    pub fn check<'a>(
        &mut self,
        range: &TimeRange,
        now: NaiveDateTime,
        tasks: impl IntoIterator<Item = &'a Task>,
    ) -> Vec<TaskNotification> {
        let info = range.info(now.time().into());
        let forward = tick_tolerance(range);
        let backward = match (self.policy, self.last_tick) {
            (TolerancePolicy::TickDelta, Some(last)) if now > last => {
                let gap = (now - last).num_seconds() as f64;
                forward.max(gap / info.duration.max(1) as f64)
            }
            _ => forward,
        };
        self.last_tick = Some(now);

        if !info.in_range {
            return Vec::new();
        }

        let mut fired = Vec::new();
        for task in tasks {
            if self.fired.contains(&task.id) || !range.contains(task.time) {
                continue;
            }
            let diff = info.progress - range.progress(task.time);
            if diff <= backward + FLOAT_SLACK && -diff <= forward + FLOAT_SLACK {
                self.fired.insert(task.id.clone());
                fired.push(TaskNotification {
                    task_id: task.id.clone(),
                    name: task.name.clone(),
                    time: task.time,
                });
            }
        }
        fired.sort_by_key(|n| n.time);
        fired
    }
}
