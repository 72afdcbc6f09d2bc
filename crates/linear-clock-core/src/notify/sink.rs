//! Notification delivery seam.

use serde::{Deserialize, Serialize};

use super::tracker::TaskNotification;
use crate::error::Result;
use crate::storage::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

/// A transient system notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub urgency: Urgency,
    pub duration_ms: u64,
}

impl Notification {
    pub fn for_task(fired: &TaskNotification, config: &NotificationsConfig) -> Self {
        Self {
            title: config.title.clone(),
            body: format!("{} ({})", fired.name, fired.time),
            urgency: config.urgency,
            duration_ms: config.duration_ms,
        }
    }
}

/// Something that can show a notification to the user.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Vec<Notification>,
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, notification: &Notification) -> Result<()> {
        self.delivered.push(notification.clone());
        Ok(())
    }
}
