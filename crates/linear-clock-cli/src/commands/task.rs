use clap::Subcommand;
use linear_clock_core::interchange::parse_time;
use linear_clock_core::TimeOfDay;

use super::session::Session;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task for today
    Add {
        /// Task time (e.g. "09:30", "9:30 PM", "14:00:00")
        time: String,
        /// Task name
        name: String,
    },
    /// List today's tasks in time order
    List,
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New time
        #[arg(long)]
        time: Option<String>,
        /// New name
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn time_arg(raw: &str) -> Result<TimeOfDay, String> {
    parse_time(raw).ok_or_else(|| format!("unrecognized time: {raw}"))
}

pub fn run(action: TaskAction) -> super::CliResult {
    let mut session = Session::open()?;
    match action {
        TaskAction::Add { time, name } => {
            let id = session.engine.add_task(time_arg(&time)?, &name)?;
            session.save()?;
            if let Some(task) = session.engine.task(&id) {
                println!("{}", serde_json::to_string_pretty(task)?);
            }
        }
        TaskAction::List => {
            let range = session.engine.range();
            let tasks: Vec<_> = session
                .engine
                .tasks_sorted()
                .into_iter()
                .map(|task| {
                    serde_json::json!({
                        "id": task.id,
                        "time": task.time,
                        "name": task.name,
                        "position": range.contains(task.time).then(|| range.progress(task.time)),
                        "notified": session.engine.is_notified(&task.id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Update { id, time, name } => {
            let current = session
                .engine
                .task(&id)
                .cloned()
                .ok_or_else(|| format!("task not found: {id}"))?;
            let time = match time {
                Some(raw) => time_arg(&raw)?,
                None => current.time,
            };
            let name = name.unwrap_or(current.name);
            session.engine.update_task(&id, time, &name)?;
            session.save()?;
            println!("task {id} updated");
        }
        TaskAction::Delete { id } => match session.engine.delete_task(&id) {
            Some(task) => {
                session.save()?;
                println!("deleted {} ({})", task.name, task.time);
            }
            None => return Err(format!("task not found: {id}").into()),
        },
    }
    Ok(())
}
