use linear_clock_core::Clock;

use super::session::Session;

pub fn run() -> super::CliResult {
    let session = Session::open()?;
    let engine = &session.engine;
    let now = engine.clock().now();
    let info = engine.get_progress_snapshot();

    let json = serde_json::json!({
        "now": now,
        "range": engine.range(),
        "configured_range": engine.configured_range(),
        "focus_task_id": engine.focus().map(|f| f.task_id.clone()),
        "progress": info.progress,
        "elapsed": info.elapsed,
        "duration": info.duration,
        "in_range": info.in_range,
        "tasks": engine.task_count(),
        "screen_index": session.config.display.screen_index,
        "bar_position": session.config.display.bar_position,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Resolve a bar position to a time and the task marker under it.
pub fn run_at(position: f64, tolerance: f64) -> super::CliResult {
    if !(0.0..=1.0).contains(&position) {
        return Err(format!("position must be within 0.0..=1.0, got {position}").into());
    }
    let session = Session::open()?;
    let engine = &session.engine;
    let task = engine
        .task_at_position(position, tolerance)
        .and_then(|id| engine.task(&id).cloned());

    let json = serde_json::json!({
        "position": position,
        "time": engine.time_for_position(position),
        "task": task,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
