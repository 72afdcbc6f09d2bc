//! JSON task import and export.
//!
//! Exports always use one shape. Imports are lenient: they accept the export
//! shape, bare arrays, calendar-style `events`/`items` lists and single
//! objects, with field names looked up through ordered alias lists.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{TimeOfDay, TimeRange};
use crate::error::ImportError;
use crate::task::{sort_by_time, Task};

/// Keys that may hold the task list, in priority order.
pub const LIST_FIELDS: &[&str] = &["tasks", "events", "items"];
/// Keys that may hold a task's name, in priority order.
pub const NAME_FIELDS: &[&str] = &["name", "title", "task", "description", "label"];
/// Keys that may hold a task's time, in priority order.
pub const TIME_FIELDS: &[&str] = &["time", "start_time", "start", "datetime", "timestamp"];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M:%S%p",
    "%I:%M %p",
    "%I:%M%p",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedTask {
    pub name: String,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRange {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// The file written by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub tasks: Vec<ExportedTask>,
    pub exported_date: NaiveDate,
    pub exported_time: TimeOfDay,
    pub time_range: ExportedRange,
}

impl ExportDocument {
    pub fn new(tasks: &[Task], range: &TimeRange, now: NaiveDateTime) -> Self {
        let mut sorted = tasks.to_vec();
        sort_by_time(&mut sorted);
        Self {
            tasks: sorted
                .into_iter()
                .map(|t| ExportedTask {
                    name: t.name,
                    time: t.time,
                })
                .collect(),
            exported_date: now.date(),
            exported_time: now.time().into(),
            time_range: ExportedRange {
                start_time: range.start,
                end_time: range.end,
            },
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A task read from an import document, not yet given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedTask {
    pub name: String,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub tasks: Vec<ImportedTask>,
    /// Records without a usable name or time.
    pub skipped: usize,
}

/// Parse an import document.
///
/// # Errors
///
/// [`ImportError::InvalidJson`] if `text` is not JSON,
/// [`ImportError::NoValidTasks`] if no record yields a task.
pub fn parse_import(text: &str) -> Result<ImportSummary, ImportError> {
    let doc: Value = serde_json::from_str(text).map_err(ImportError::InvalidJson)?;

    let mut summary = ImportSummary::default();
    for record in records(&doc) {
        match record.as_object().and_then(read_record) {
            Some(task) => summary.tasks.push(task),
            None => summary.skipped += 1,
        }
    }

    if summary.tasks.is_empty() {
        return Err(ImportError::NoValidTasks {
            skipped: summary.skipped,
        });
    }
    tracing::debug!(
        imported = summary.tasks.len(),
        skipped = summary.skipped,
        "parsed import document"
    );
    Ok(summary)
}

fn records(doc: &Value) -> Vec<&Value> {
    match doc {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => LIST_FIELDS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .map(|items| items.iter().collect())
            .unwrap_or_else(|| vec![doc]),
        other => vec![other],
    }
}

/// First alias holding a non-blank string.
fn first_text<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn read_record(obj: &Map<String, Value>) -> Option<ImportedTask> {
    let name = first_text(obj, NAME_FIELDS)?;
    let time = parse_time(first_text(obj, TIME_FIELDS)?)?;
    Some(ImportedTask {
        name: name.to_string(),
        time,
    })
}

/// Parse a time from any of the accepted import formats.
///
/// Tries 24-hour clock, 12-hour clock, full date-times and finally bare ISO
/// times with fractional seconds.
pub fn parse_time(raw: &str) -> Option<TimeOfDay> {
    let s = raw.trim();

    if let Some(t) = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
    {
        return Some(t.into());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.time().into());
    }

    // Wall time in the document's own offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.time().into());
    }

    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .ok()
        .map(TimeOfDay::from)
}
