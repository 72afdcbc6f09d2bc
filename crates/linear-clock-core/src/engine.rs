//! Time range engine.
//!
//! The engine is the single owner of the bar's mutable state: the configured
//! range, an optional focus override, today's tasks and the notification
//! session. It does not use internal threads or timers - the caller is
//! responsible for calling `tick()` about once a second.
//!
//! ## Session resets
//!
//! ```text
//! set_range / enter_focus / exit_focus / load_day
//!     -> notified set rebuilt from the tasks already behind "now"
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimeRangeEngine::new(SystemClock, config.range.time_range(), tasks);
//! // In a loop:
//! for fired in engine.tick() {
//!     sink.notify(&Notification::for_task(&fired, &config.notifications))?;
//! }
//! ```

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::clock::{Clock, RangeInfo, SystemClock, TimeOfDay, TimeRange};
use crate::error::{ImportError, ValidationError};
use crate::events::Event;
use crate::focus::FocusOverride;
use crate::interchange::{parse_import, ExportDocument};
use crate::notify::{NotificationTracker, TaskNotification, TolerancePolicy};
use crate::task::{normalize_name, sort_by_time, Task, TaskId};

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub task_ids: Vec<TaskId>,
    pub skipped: usize,
}

/// Session object for one bar.
pub struct TimeRangeEngine<C: Clock = SystemClock> {
    clock: C,
    configured: TimeRange,
    focus: Option<FocusOverride>,
    tasks: HashMap<TaskId, Task>,
    tracker: NotificationTracker,
    session_date: NaiveDate,
    events: Vec<Event>,
}

impl<C: Clock> TimeRangeEngine<C> {
    /// Start a session for today with the given range and task bucket.
    pub fn new(clock: C, range: TimeRange, tasks: Vec<Task>) -> Self {
        let session_date = clock.now().date();
        let mut engine = Self {
            clock,
            configured: range,
            focus: None,
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
            tracker: NotificationTracker::default(),
            session_date,
            events: Vec::new(),
        };
        engine.reset_session();
        engine
    }

    pub fn with_policy(mut self, policy: TolerancePolicy) -> Self {
        self.tracker.set_policy(policy);
        self.reset_session();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The range currently mapped onto the bar (focus override included).
    pub fn range(&self) -> TimeRange {
        self.focus
            .as_ref()
            .map(|f| f.active_range)
            .unwrap_or(self.configured)
    }

    /// The user's configured range, ignoring any focus override.
    pub fn configured_range(&self) -> TimeRange {
        self.configured
    }

    pub fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    pub fn focus(&self) -> Option<&FocusOverride> {
        self.focus.as_ref()
    }

    pub fn is_focus_active(&self) -> bool {
        self.focus.is_some()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks_sorted(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        sort_by_time(&mut tasks);
        tasks
    }

    /// Whether `id` has already been notified this session.
    pub fn is_notified(&self, id: &str) -> bool {
        self.tracker.is_fired(id)
    }

    pub fn get_progress_snapshot(&self) -> RangeInfo {
        self.range().info(self.now_time())
    }

    /// Time of day under a fractional bar position.
    pub fn time_for_position(&self, position: f64) -> TimeOfDay {
        self.range().time_at(position)
    }

    /// The task marker closest to `position`, if one lies within `tolerance`.
    ///
    /// Ties go to the earlier task.
    pub fn task_at_position(&self, position: f64, tolerance: f64) -> Option<TaskId> {
        let range = self.range();
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        self.tasks
            .values()
            .filter(|t| range.contains(t.time))
            .map(|t| ((range.progress(t.time) - position).abs(), t))
            .filter(|(distance, _)| *distance <= tolerance)
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.time.cmp(&b.time)))
            .map(|(_, t)| t.id.clone())
    }

    /// True once a focus countdown has (nearly) reached its task.
    /// The caller responds with [`TimeRangeEngine::exit_focus`].
    pub fn should_auto_exit_focus(&self) -> bool {
        self.focus
            .as_ref()
            .is_some_and(|f| f.is_complete(self.now_time()))
    }

    /// Whether the clock has moved past the session's calendar day.
    pub fn is_new_day(&self) -> bool {
        self.now().date() != self.session_date
    }

    /// Drain events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::new(&self.tasks_sorted(), &self.configured, self.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Returns the tasks reached since the last tick.
    ///
    /// A tick on a new calendar day first starts an empty day; callers that
    /// keep per-day storage should call [`TimeRangeEngine::load_day`] before
    /// ticking when [`TimeRangeEngine::is_new_day`] is true.
    pub fn tick(&mut self) -> Vec<TaskNotification> {
        if self.is_new_day() {
            let today = self.now().date();
            self.load_day(today, Vec::new());
        }

        let now = self.now();
        let range = self.range();
        let fired = self.tracker.check(&range, now, self.tasks.values());
        for n in &fired {
            tracing::info!(task_id = %n.task_id, name = %n.name, time = %n.time, "task reached");
            self.events.push(Event::TaskNotified {
                task_id: n.task_id.clone(),
                name: n.name.clone(),
                time: n.time,
                at: now,
            });
        }
        fired
    }

    /// Replace the configured range. Leaves focus mode first if active.
    pub fn set_range(&mut self, range: TimeRange) {
        if self.focus.is_some() {
            self.exit_focus();
        }
        tracing::info!(range = %range, "range changed");
        self.configured = range;
        self.events.push(Event::RangeChanged {
            range,
            at: self.now(),
        });
        self.reset_session();
    }

    /// Count down from now to the task's time.
    ///
    /// Returns `false` without changing anything if the task is unknown, its
    /// time is exactly now, or focus is already active.
    pub fn enter_focus(&mut self, task_id: &str) -> bool {
        if self.focus.is_some() {
            tracing::debug!(%task_id, "focus already active");
            return false;
        }
        let Some(task) = self.tasks.get(task_id) else {
            tracing::debug!(%task_id, "focus requested for unknown task");
            return false;
        };

        let now = self.now();
        if task.time == TimeOfDay::from(now.time()) {
            tracing::debug!(%task_id, "focus requested for a task due now");
            return false;
        }
        let focus = FocusOverride::new(self.configured, now.time().into(), task.id.clone(), task.time);
        tracing::info!(%task_id, range = %focus.active_range, "focus entered");
        self.events.push(Event::FocusEntered {
            task_id: focus.task_id.clone(),
            range: focus.active_range,
            at: now,
        });
        self.focus = Some(focus);
        self.reset_session();
        true
    }

    /// Restore the configured range. Returns `false` if focus was not active.
    pub fn exit_focus(&mut self) -> bool {
        let Some(focus) = self.focus.take() else {
            return false;
        };
        tracing::info!(task_id = %focus.task_id, restored = %focus.saved_range, "focus exited");
        self.configured = focus.saved_range;
        self.events.push(Event::FocusExited {
            restored: focus.saved_range,
            at: self.now(),
        });
        self.reset_session();
        true
    }

    /// Reinstate a focus override persisted by a previous process.
    ///
    /// Returns `false` if focus is already active or the anchor task is gone.
    pub fn restore_focus(&mut self, focus: FocusOverride) -> bool {
        if self.focus.is_some() || !self.tasks.contains_key(&focus.task_id) {
            return false;
        }
        tracing::debug!(task_id = %focus.task_id, "focus restored");
        self.focus = Some(focus);
        self.reset_session();
        true
    }

    pub fn add_task(&mut self, time: TimeOfDay, name: &str) -> Result<TaskId, ValidationError> {
        let task = Task::new(time, name)?;
        let id = task.id.clone();
        let (range, now_time) = (self.range(), self.now_time());
        self.tracker.seed(&range, now_time, &task);
        self.events.push(Event::TaskAdded {
            task_id: id.clone(),
            time,
            at: self.now(),
        });
        self.tasks.insert(id.clone(), task);
        Ok(id)
    }

    /// Change a task's time and name.
    ///
    /// Re-timing the focus anchor ends focus mode.
    pub fn update_task(&mut self, id: &str, time: TimeOfDay, name: &str) -> Result<(), ValidationError> {
        let name = normalize_name(name)?;
        let range = self.range();
        let now_time = self.now_time();
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| ValidationError::TaskNotFound(id.to_string()))?;

        let retimed = task.time != time;
        task.time = time;
        task.name = name;
        if retimed {
            self.tracker.seed(&range, now_time, task);
        }

        self.events.push(Event::TaskUpdated {
            task_id: id.to_string(),
            time,
            at: self.now(),
        });
        if retimed && self.is_anchor(id) {
            self.exit_focus();
        }
        Ok(())
    }

    /// Remove a task. Deleting the focus anchor ends focus mode.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let task = self.tasks.remove(id)?;
        self.tracker.forget(id);
        self.events.push(Event::TaskDeleted {
            task_id: task.id.clone(),
            at: self.now(),
        });
        if self.is_anchor(id) {
            self.exit_focus();
        }
        Some(task)
    }

    /// Start the session for `date` with that day's task bucket.
    ///
    /// Any focus override belongs to the previous day and is dropped.
    pub fn load_day(&mut self, date: NaiveDate, tasks: Vec<Task>) {
        let now = self.now();
        if let Some(focus) = self.focus.take() {
            self.configured = focus.saved_range;
            self.events.push(Event::FocusExited {
                restored: focus.saved_range,
                at: now,
            });
        }
        self.tasks = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        self.session_date = date;
        tracing::info!(%date, tasks = self.tasks.len(), "day started");
        self.events.push(Event::DayStarted {
            date,
            task_count: self.tasks.len(),
            at: now,
        });
        self.reset_session();
    }

    /// Replace today's tasks with a freshly loaded copy of the same bucket.
    ///
    /// Tasks whose time is unchanged keep their notified state; new and
    /// re-timed tasks are seeded against now. Losing or re-timing the focus
    /// anchor ends focus mode.
    pub fn sync_tasks(&mut self, tasks: Vec<Task>) {
        let range = self.range();
        let now_time = self.now_time();
        let incoming: HashMap<TaskId, Task> = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();

        for id in self.tasks.keys() {
            if !incoming.contains_key(id) {
                self.tracker.forget(id);
            }
        }
        for task in incoming.values() {
            let unchanged = self.tasks.get(&task.id).is_some_and(|old| old.time == task.time);
            if !unchanged {
                self.tracker.seed(&range, now_time, task);
            }
        }

        let anchor_moved = self.focus.as_ref().is_some_and(|f| {
            incoming.get(&f.task_id).map(|t| t.time) != self.tasks.get(&f.task_id).map(|t| t.time)
        });
        self.tasks = incoming;
        tracing::debug!(tasks = self.tasks.len(), "tasks reloaded");
        self.events.push(Event::TasksReloaded {
            task_count: self.tasks.len(),
            at: self.now(),
        });
        if anchor_moved {
            self.exit_focus();
        }
    }

    /// Add every task found in an import document.
    ///
    /// # Errors
    ///
    /// Invalid JSON and documents without usable tasks are reported without
    /// touching the existing tasks.
    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        let summary = parse_import(text)?;
        let range = self.range();
        let now_time = self.now_time();

        let mut report = ImportReport {
            task_ids: Vec::with_capacity(summary.tasks.len()),
            skipped: summary.skipped,
        };
        for imported in summary.tasks {
            match Task::new(imported.time, &imported.name) {
                Ok(task) => {
                    self.tracker.seed(&range, now_time, &task);
                    report.task_ids.push(task.id.clone());
                    self.tasks.insert(task.id.clone(), task);
                }
                Err(_) => report.skipped += 1,
            }
        }

        tracing::info!(
            imported = report.task_ids.len(),
            skipped = report.skipped,
            "tasks imported"
        );
        self.events.push(Event::TasksImported {
            imported: report.task_ids.len(),
            skipped: report.skipped,
            at: self.now(),
        });
        Ok(report)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn now_time(&self) -> TimeOfDay {
        self.now().time().into()
    }

    fn is_anchor(&self, id: &str) -> bool {
        self.focus.as_ref().is_some_and(|f| f.task_id == id)
    }

    fn reset_session(&mut self) {
        let range = self.range();
        let now = self.now_time();
        self.tracker.reset(&range, now, self.tasks.values());
    }
}
