//! Core error types for linear-clock-core.
//!
//! Every failure path in the core is recoverable: callers degrade to a safe
//! default and surface the message to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for linear-clock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Task import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dotted configuration key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not resolve the data directory
    #[error("Could not resolve data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Hour, minute or second outside its range
    #[error("Invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTimeOfDay { hour: u32, minute: u32, second: u32 },

    /// Text that is not an `HH:MM:SS` time
    #[error("Cannot parse '{0}' as HH:MM:SS")]
    MalformedTime(String),

    /// Task name is empty after trimming
    #[error("Task name must not be empty")]
    EmptyTaskName,

    /// No task with this id in the current day bucket
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Task import errors.
///
/// A document that is not JSON at all is reported separately from one that
/// parses but holds nothing usable.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The JSON parsed but no record had both a name and a time
    #[error("No valid tasks found ({skipped} records skipped)")]
    NoValidTasks { skipped: usize },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
