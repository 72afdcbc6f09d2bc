use clap::Subcommand;
use linear_clock_core::{Config, Database};

use super::session::mark_changed;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "range.start_time", "notifications.enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> super::CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            config.save()?;
            mark_changed(&Database::open()?)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            mark_changed(&Database::open()?)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
