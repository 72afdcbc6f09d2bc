//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Which screen the bar sits on and along which edge
//! - The configured time range
//! - Notification appearance
//! - Notification tolerance policy
//!
//! Configuration is stored at `~/.config/linear-clock/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::{TimeOfDay, TimeRange};
use crate::error::ConfigError;
use crate::notify::{TolerancePolicy, Urgency};

/// Screen edge the bar is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    #[default]
    Top,
    Bottom,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 0 is the primary screen.
    #[serde(default)]
    pub screen_index: usize,
    #[serde(default)]
    pub bar_position: BarPosition,
}

/// Range configuration.
///
/// Times stay as text so a hand-edited file with a bad value still loads;
/// [`RangeConfig::time_range`] falls back to the full day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

/// Notification tracker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tolerance_policy: TolerancePolicy,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/linear-clock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

// Default functions
fn default_start_time() -> String {
    TimeOfDay::MIDNIGHT.to_string()
}
fn default_end_time() -> String {
    TimeOfDay::LAST_SECOND.to_string()
}
fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Linear Clock".into()
}
fn default_duration_ms() -> u64 {
    5000
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_index: 0,
            bar_position: BarPosition::Top,
        }
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            end_time: default_end_time(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_title(),
            urgency: Urgency::Normal,
            duration_ms: default_duration_ms(),
        }
    }
}

impl DisplayConfig {
    /// The configured screen, or the primary one if it no longer exists.
    pub fn resolve_screen(&self, screen_count: usize) -> usize {
        if self.screen_index < screen_count {
            self.screen_index
        } else {
            0
        }
    }
}

impl RangeConfig {
    /// The configured range, or the full day if either bound is malformed.
    pub fn time_range(&self) -> TimeRange {
        match (
            self.start_time.parse::<TimeOfDay>(),
            self.end_time.parse::<TimeOfDay>(),
        ) {
            (Ok(start), Ok(end)) => TimeRange::new(start, end),
            (start, end) => {
                tracing::warn!(
                    start_time = %self.start_time,
                    end_time = %self.end_time,
                    start_ok = start.is_ok(),
                    end_ok = end.is_ok(),
                    "malformed range in config, using full day"
                );
                TimeRange::default()
            }
        }
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.start_time = range.start.to_string();
        self.end_time = range.end.to_string();
    }
}

const TIME_KEYS: &[&str] = &["range.start_time", "range.end_time"];

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `config.toml` inside [`data_dir`].
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, creating it with defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the default cannot
    /// be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type. Range bounds must be `HH:MM:SS`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if TIME_KEYS.contains(&key) {
            value
                .parse::<TimeOfDay>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
