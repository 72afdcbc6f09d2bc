//! SQLite-based task storage.
//!
//! Provides persistent storage for:
//! - Per-day task buckets, keyed by calendar date
//! - Key-value store for transient application state (focus override)

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::task::{sort_by_time, Task};

/// SQLite database for day-scoped tasks.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/linear-clock/linear-clock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("linear-clock.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS day_tasks (
                id       TEXT PRIMARY KEY,
                day      TEXT NOT NULL,
                position INTEGER NOT NULL,
                time     TEXT NOT NULL,
                name     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_day_tasks_day ON day_tasks(day, position);",
        )?;
        Ok(())
    }

    /// Load the task bucket for `day`, in stored order.
    ///
    /// Rows whose time no longer parses are skipped; the rest still load.
    pub fn load_day(&self, day: NaiveDate) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, time, name FROM day_tasks WHERE day = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![day], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, time, name) = row?;
            match time.parse() {
                Ok(time) => tasks.push(Task { id, time, name }),
                Err(e) => tracing::warn!(%id, %day, error = %e, "skipping stored task"),
            }
        }
        Ok(tasks)
    }

    /// Replace the task bucket for `day`, storing it sorted by time.
    pub fn save_day(&self, day: NaiveDate, tasks: &[Task]) -> Result<(), DatabaseError> {
        let mut sorted = tasks.to_vec();
        sort_by_time(&mut sorted);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM day_tasks WHERE day = ?1", params![day])?;
        for (position, task) in sorted.iter().enumerate() {
            tx.execute(
                "INSERT OR REPLACE INTO day_tasks (id, day, position, time, name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![task.id, day, position as i64, task.time.to_string(), task.name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Days that have at least one stored task, oldest first.
    pub fn days(&self) -> Result<Vec<NaiveDate>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT day FROM day_tasks ORDER BY day")?;
        let days = stmt
            .query_map([], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(days)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeOfDay;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn task(time: &str, name: &str) -> Task {
        Task::new(time.parse::<TimeOfDay>().unwrap(), name).unwrap()
    }

    #[test]
    fn day_buckets_are_separate_and_sorted() {
        let db = Database::open_memory().unwrap();
        db.save_day(day(1), &[task("15:00:00", "Late"), task("08:00:00", "Early")])
            .unwrap();
        db.save_day(day(2), &[task("10:00:00", "Other day")]).unwrap();

        let first = db.load_day(day(1)).unwrap();
        let names: Vec<_> = first.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Early", "Late"]);
        assert_eq!(db.load_day(day(2)).unwrap().len(), 1);
        assert!(db.load_day(day(3)).unwrap().is_empty());
        assert_eq!(db.days().unwrap(), vec![day(1), day(2)]);
    }

    #[test]
    fn save_day_replaces_bucket() {
        let db = Database::open_memory().unwrap();
        let keep = task("09:00:00", "Keep");
        db.save_day(day(1), &[keep.clone(), task("11:00:00", "Drop")])
            .unwrap();
        db.save_day(day(1), &[keep.clone()]).unwrap();
        assert_eq!(db.load_day(day(1)).unwrap(), vec![keep]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let db = Database::open_memory().unwrap();
        db.save_day(day(1), &[task("09:00:00", "Good")]).unwrap();
        db.conn
            .execute(
                "INSERT INTO day_tasks (id, day, position, time, name) VALUES ('bad', ?1, 1, 'noon', 'Bad')",
                params![day(1)],
            )
            .unwrap();
        let tasks = db.load_day(day(1)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Good");
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.save_day(day(5), &[task("12:00:00", "Lunch")]).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.load_day(day(5)).unwrap()[0].name, "Lunch");
    }
}
