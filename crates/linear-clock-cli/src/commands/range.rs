use clap::Subcommand;
use linear_clock_core::{TimeOfDay, TimeRange};

use super::session::Session;

#[derive(Subcommand)]
pub enum RangeAction {
    /// Show the configured range
    Show,
    /// Set the configured range (HH:MM:SS, may wrap past midnight)
    Set {
        /// Range start
        start: TimeOfDay,
        /// Range end; equal to start means a full day
        end: TimeOfDay,
    },
}

pub fn run(action: RangeAction) -> super::CliResult {
    match action {
        RangeAction::Show => {
            let session = Session::open()?;
            let range = session.engine.configured_range();
            let json = serde_json::json!({
                "start_time": range.start,
                "end_time": range.end,
                "duration": range.duration(),
                "wraps_midnight": range.is_wrapping(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        RangeAction::Set { start, end } => {
            let mut session = Session::open()?;
            let range = TimeRange::new(start, end);
            session.config.range.set_time_range(range);
            session.save_config()?;
            session.engine.set_range(range);
            session.save()?;
            println!("range set to {range}");
        }
    }
    Ok(())
}
