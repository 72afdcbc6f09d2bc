mod config;
pub mod database;

pub use config::{BarPosition, Config, DisplayConfig, NotificationsConfig, RangeConfig, TrackerConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/linear-clock[-dev]/` based on LINEAR_CLOCK_ENV.
///
/// Set LINEAR_CLOCK_ENV=dev to use a development data directory, or
/// LINEAR_CLOCK_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LINEAR_CLOCK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LINEAR_CLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("linear-clock-dev")
            } else {
                base_dir.join("linear-clock")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
