mod sink;
mod tracker;

pub use sink::{MemorySink, Notification, NotificationSink, Urgency};
pub use tracker::{
    tick_tolerance, NotificationTracker, TaskNotification, TolerancePolicy, FALLBACK_TOLERANCE,
};
