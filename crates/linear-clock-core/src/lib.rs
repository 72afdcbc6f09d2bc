//! # Linear Clock Core Library
//!
//! This library provides the core logic for Linear Clock, a bar along one
//! screen edge that fills up as the day (or a configured part of it) passes.
//! Front ends (the CLI, or any GUI layer) only draw the bar and forward user
//! actions; every piece of state lives in the engine defined here.
//!
//! ## Architecture
//!
//! - **Clock**: `TimeOfDay` / `TimeRange` values and the time ↔ progress
//!   mapping, including ranges that wrap past midnight
//! - **Engine**: A wall-clock session object that requires the caller to
//!   periodically invoke `tick()` for task notifications
//! - **Notify**: At-most-once notification tracking and the sink seam
//! - **Storage**: SQLite per-day task storage and TOML-based configuration
//! - **Interchange**: JSON task import/export
//!
//! ## Key Components
//!
//! - [`TimeRangeEngine`]: Session state machine
//! - [`TimeRange`]: Progress math
//! - [`Database`]: Day-scoped task persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod focus;
pub mod interchange;
pub mod notify;
pub mod storage;
pub mod task;

pub use clock::{Clock, ManualClock, RangeInfo, SystemClock, TimeOfDay, TimeRange};
pub use engine::{ImportReport, TimeRangeEngine};
pub use error::{ConfigError, CoreError, DatabaseError, ImportError, ValidationError};
pub use events::Event;
pub use focus::FocusOverride;
pub use interchange::{parse_import, ExportDocument};
pub use notify::{
    MemorySink, Notification, NotificationSink, TaskNotification, TolerancePolicy, Urgency,
};
pub use storage::{Config, Database};
pub use task::{Task, TaskId};
