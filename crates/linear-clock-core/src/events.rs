use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::{TimeOfDay, TimeRange};
use crate::task::TaskId;

/// Every state change of the engine produces an Event.
/// Front ends drain them to refresh their view or write logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskNotified {
        task_id: TaskId,
        name: String,
        time: TimeOfDay,
        at: NaiveDateTime,
    },
    TaskAdded {
        task_id: TaskId,
        time: TimeOfDay,
        at: NaiveDateTime,
    },
    TaskUpdated {
        task_id: TaskId,
        time: TimeOfDay,
        at: NaiveDateTime,
    },
    TaskDeleted {
        task_id: TaskId,
        at: NaiveDateTime,
    },
    TasksImported {
        imported: usize,
        skipped: usize,
        at: NaiveDateTime,
    },
    /// Today's bucket was replaced by a copy saved elsewhere.
    TasksReloaded {
        task_count: usize,
        at: NaiveDateTime,
    },
    RangeChanged {
        range: TimeRange,
        at: NaiveDateTime,
    },
    FocusEntered {
        task_id: TaskId,
        range: TimeRange,
        at: NaiveDateTime,
    },
    FocusExited {
        restored: TimeRange,
        at: NaiveDateTime,
    },
    /// A new calendar day replaced the task bucket.
    DayStarted {
        date: NaiveDate,
        task_count: usize,
        at: NaiveDateTime,
    },
}
