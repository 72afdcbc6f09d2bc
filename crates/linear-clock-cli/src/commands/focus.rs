use clap::Subcommand;

use super::session::Session;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Narrow the bar to [now, task time)
    Enter {
        /// Task ID
        id: String,
    },
    /// Restore the configured range
    Exit,
    /// Show the active focus override, if any
    Status,
}

pub fn run(action: FocusAction) -> super::CliResult {
    let mut session = Session::open()?;
    match action {
        FocusAction::Enter { id } => {
            if !session.engine.enter_focus(&id) {
                return Err(format!("cannot focus on task {id}").into());
            }
            session.save()?;
            let range = session.engine.range();
            println!("focus on {id} over {range}");
        }
        FocusAction::Exit => {
            if session.engine.exit_focus() {
                session.save()?;
                println!("focus exited");
            } else {
                println!("focus not active");
            }
        }
        FocusAction::Status => {
            let json = match session.engine.focus() {
                Some(focus) => serde_json::json!({
                    "active": true,
                    "task_id": focus.task_id,
                    "range": focus.active_range,
                    "saved_range": focus.saved_range,
                    "progress": session.engine.get_progress_snapshot().progress,
                }),
                None => serde_json::json!({ "active": false }),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
