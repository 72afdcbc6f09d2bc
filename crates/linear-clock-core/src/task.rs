//! Point-in-time tasks drawn as markers on the bar.

use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::error::ValidationError;

/// Unique identifier for a task.
pub type TaskId = String;

/// A named moment of today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub time: TimeOfDay,
    pub name: String,
}

impl Task {
    /// Create a task with a fresh id.
    pub fn new(time: TimeOfDay, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            time,
            name: normalize_name(name)?,
        })
    }
}

/// Trim a display name, rejecting empty ones.
pub(crate) fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTaskName);
    }
    Ok(trimmed.to_string())
}

/// Tasks ordered by time, then name.
pub fn sort_by_time(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_trims_name_and_gets_unique_id() {
        let time = TimeOfDay::new(9, 30, 0).unwrap();
        let a = Task::new(time, "  Standup ").unwrap();
        let b = Task::new(time, "Standup").unwrap();
        assert_eq!(a.name, "Standup");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_name_is_rejected() {
        let time = TimeOfDay::MIDNIGHT;
        assert_eq!(Task::new(time, "   "), Err(ValidationError::EmptyTaskName));
    }

    #[test]
    fn sorts_by_time_then_name() {
        let mut tasks = vec![
            Task::new(TimeOfDay::new(12, 0, 0).unwrap(), "Lunch").unwrap(),
            Task::new(TimeOfDay::new(9, 0, 0).unwrap(), "b").unwrap(),
            Task::new(TimeOfDay::new(9, 0, 0).unwrap(), "a").unwrap(),
        ];
        sort_by_time(&mut tasks);
        let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "Lunch"]);
    }
}
