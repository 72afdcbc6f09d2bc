//! Engine state shared by every command.
//!
//! Each invocation rebuilds the engine from config and today's task bucket,
//! and writes the bucket (plus any focus override) back afterwards. Every
//! write bumps a revision counter in kv so a running `watch` knows to reload.

use std::path::PathBuf;

use linear_clock_core::{
    Clock, Config, Database, DatabaseError, FocusOverride, SystemClock, TimeRangeEngine,
};

const FOCUS_KEY: &str = "focus_override";
const REVISION_KEY: &str = "revision";

type SessionResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct Session<C: Clock = SystemClock> {
    pub config: Config,
    pub db: Database,
    pub engine: TimeRangeEngine<C>,
    config_path: PathBuf,
    revision: u64,
}

impl Session {
    pub fn open() -> SessionResult<Self> {
        let config_path = Config::path()?;
        Self::with_clock(SystemClock, Config::load_or_default(), config_path, Database::open()?)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(
        clock: C,
        config: Config,
        config_path: PathBuf,
        db: Database,
    ) -> SessionResult<Self> {
        let today = clock.now().date();
        let tasks = db.load_day(today)?;
        let engine = TimeRangeEngine::new(clock, config.range.time_range(), tasks)
            .with_policy(config.tracker.tolerance_policy);

        let revision = stored_revision(&db)?;
        let mut session = Self {
            config,
            db,
            engine,
            config_path,
            revision,
        };
        session.sync_focus()?;
        Ok(session)
    }

    /// Persist today's bucket and the focus override.
    pub fn save(&mut self) -> SessionResult {
        self.db
            .save_day(self.engine.session_date(), &self.engine.tasks_sorted())?;
        self.save_focus()
    }

    /// Persist only the focus override, leaving the stored bucket alone.
    pub fn save_focus(&mut self) -> SessionResult {
        match self.engine.focus() {
            Some(focus) => self.db.kv_set(FOCUS_KEY, &serde_json::to_string(focus)?)?,
            None => self.db.kv_delete(FOCUS_KEY)?,
        }
        self.revision = mark_changed(&self.db)?;
        Ok(())
    }

    pub fn save_config(&self) -> SessionResult {
        self.config.save_to(&self.config_path)?;
        Ok(())
    }

    /// Reload config, today's bucket and focus if another process saved
    /// since this session last looked. Returns whether anything was reloaded.
    pub fn refresh(&mut self) -> SessionResult<bool> {
        let stored = stored_revision(&self.db)?;
        if stored == self.revision {
            return Ok(false);
        }
        self.revision = stored;

        let config = Config::load_from(&self.config_path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "keeping previous config");
            self.config.clone()
        });
        let range = config.range.time_range();
        if range != self.engine.configured_range() {
            self.engine.set_range(range);
        }
        self.config = config;

        let tasks = self.db.load_day(self.engine.session_date())?;
        self.engine.sync_tasks(tasks);
        self.sync_focus()?;
        tracing::debug!(revision = stored, "session refreshed");
        Ok(true)
    }

    /// Switch to the bucket stored for the clock's current day.
    pub fn roll_over(&mut self) -> SessionResult {
        let today = self.engine.clock().now().date();
        let tasks = self.db.load_day(today)?;
        self.engine.load_day(today, tasks);
        self.revision = stored_revision(&self.db)?;
        self.sync_focus()
    }

    /// Adopt the stored focus override if it differs from the engine's.
    fn sync_focus(&mut self) -> SessionResult {
        let stored = load_focus(&self.db);
        if stored.as_ref() == self.engine.focus() {
            return Ok(());
        }
        self.engine.exit_focus();
        if let Some(focus) = stored {
            if !self.engine.restore_focus(focus) {
                self.db.kv_delete(FOCUS_KEY)?;
            }
        }
        Ok(())
    }
}

/// Record that stored state changed. Returns the new revision.
pub fn mark_changed(db: &Database) -> Result<u64, DatabaseError> {
    let next = stored_revision(db)? + 1;
    db.kv_set(REVISION_KEY, &next.to_string())?;
    Ok(next)
}

fn stored_revision(db: &Database) -> Result<u64, DatabaseError> {
    Ok(db
        .kv_get(REVISION_KEY)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0))
}

fn load_focus(db: &Database) -> Option<FocusOverride> {
    let json = db.kv_get(FOCUS_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(focus) => Some(focus),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable focus state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use linear_clock_core::{ManualClock, TimeOfDay};
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 15)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn session(dir: &TempDir, clock: &ManualClock) -> Session<ManualClock> {
        let db = Database::open_at(&dir.path().join("linear-clock.db")).unwrap();
        let config_path = dir.path().join("config.toml");
        Session::with_clock(clock.clone(), Config::default(), config_path, db).unwrap()
    }

    #[test]
    fn save_bumps_revision_and_refresh_picks_it_up() {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(at(12, 0, 0));
        let mut watcher = session(&dir, &clock);
        assert!(!watcher.refresh().unwrap());

        let mut other = session(&dir, &clock);
        let id = other
            .engine
            .add_task(TimeOfDay::new(23, 59, 0).unwrap(), "Late")
            .unwrap();
        other.save().unwrap();

        assert!(watcher.refresh().unwrap());
        assert!(watcher.engine.task(&id).is_some());
        assert!(!watcher.refresh().unwrap());
    }

    #[test]
    fn saving_focus_keeps_tasks_saved_elsewhere() {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(at(12, 0, 0));
        let mut watcher = session(&dir, &clock);

        let mut other = session(&dir, &clock);
        let id = other
            .engine
            .add_task(TimeOfDay::new(23, 59, 0).unwrap(), "Late")
            .unwrap();
        other.save().unwrap();

        watcher.save_focus().unwrap();
        let reopened = session(&dir, &clock);
        assert!(reopened.engine.task(&id).is_some());
    }

    #[test]
    fn focus_entered_elsewhere_is_adopted() {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(at(12, 0, 0));
        let mut watcher = session(&dir, &clock);

        let mut other = session(&dir, &clock);
        let id = other
            .engine
            .add_task(TimeOfDay::new(12, 30, 0).unwrap(), "Write")
            .unwrap();
        assert!(other.engine.enter_focus(&id));
        other.save().unwrap();

        watcher.refresh().unwrap();
        assert_eq!(watcher.engine.focus().map(|f| f.task_id.as_str()), Some(id.as_str()));

        other.engine.exit_focus();
        other.save().unwrap();
        watcher.refresh().unwrap();
        assert!(!watcher.engine.is_focus_active());
    }
}
