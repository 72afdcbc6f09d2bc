//! Foreground clock loop: one tick per second until Ctrl-C.
//!
//! The watcher never writes the task bucket. Tasks and focus saved by other
//! commands are picked up through the session revision before each tick;
//! the only state written back is the focus override after an auto-exit.

use std::time::Duration;

use linear_clock_core::{Clock, Event, Notification, NotificationSink};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::session::Session;
use super::sink::{DesktopSink, StdoutSink};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub fn run(stdout: bool) -> super::CliResult {
    let mut session = Session::open()?;
    let mut sink: Box<dyn NotificationSink> = if stdout {
        Box::new(StdoutSink)
    } else {
        Box::new(DesktopSink)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;
    runtime.block_on(watch_loop(&mut session, sink.as_mut()))
}

async fn watch_loop(session: &mut Session, sink: &mut dyn NotificationSink) -> super::CliResult {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(range = %session.engine.range(), tasks = session.engine.task_count(), "watching");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                step(session, sink)?;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("received ctrl-c");
                break;
            }
        }
    }

    info!("watch stopped");
    Ok(())
}

/// One tick of the watcher.
pub(crate) fn step<C: Clock>(
    session: &mut Session<C>,
    sink: &mut dyn NotificationSink,
) -> super::CliResult {
    if session.engine.is_new_day() {
        session.roll_over()?;
    } else {
        session.refresh()?;
    }

    let fired = session.engine.tick();
    if session.config.notifications.enabled {
        for task in &fired {
            let notification = Notification::for_task(task, &session.config.notifications);
            if let Err(e) = sink.notify(&notification) {
                warn!(task_id = %task.task_id, error = %e, "notification not delivered");
            }
        }
    } else if !fired.is_empty() {
        debug!(count = fired.len(), "notifications disabled");
    }

    if session.engine.should_auto_exit_focus() {
        session.engine.exit_focus();
    }

    let mut focus_changed = false;
    for event in session.engine.drain_events() {
        debug!(?event, "engine event");
        focus_changed |= matches!(event, Event::FocusExited { .. });
    }

    if focus_changed {
        session.save_focus()?;
    }
    Ok(())
}
