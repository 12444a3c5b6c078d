//! SQLite-backed task store.
//!
//! One table, `pomodoro(task, finished, date)`. Start times are stored as
//! local `YYYY-MM-DD HH:MM:SS.ffffff` text so a date prefix selects a day.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use rusqlite::{params, Connection};
use tracing::debug;

use super::TaskStore;
use crate::{error::StoreError, state::SessionRecord};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!("Opening task store at {}", path.display());
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pomodoro (
                task     TEXT NOT NULL,
                finished INTEGER NOT NULL DEFAULT 0,
                date     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pomodoro_date ON pomodoro(date);",
        )?;
        Ok(())
    }

    /// Insert a record with its completion flag as given
    pub fn insert_record(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO pomodoro (task, finished, date) VALUES (?1, ?2, ?3)",
            params![
                record.task_name,
                record.completed_full,
                format_timestamp(record.started_at),
            ],
        )?;
        Ok(())
    }
}

impl TaskStore for SqliteTaskStore {
    fn insert_task(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError> {
        self.insert_record(&SessionRecord::started(name, started_at))
    }

    fn mark_finished_full(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE pomodoro SET finished = 1 WHERE task = ?1 AND date = ?2",
            params![name, format_timestamp(started_at)],
        )?;
        if updated == 0 {
            debug!("No task '{}' to mark finished", name);
        }
        Ok(())
    }

    fn list_unique_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(date, 1, 10) AS day FROM pomodoro ORDER BY day DESC",
        )?;
        let days = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        days.into_iter()
            .map(|day| {
                NaiveDate::parse_from_str(&day, DATE_FORMAT)
                    .map_err(|_| StoreError::InvalidTimestamp { value: day })
            })
            .collect()
    }

    fn list_tasks_by_date(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT task, finished, date FROM pomodoro WHERE date LIKE ?1 ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![date_prefix(date)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(task_name, completed_full, date)| {
                Ok(SessionRecord {
                    task_name,
                    completed_full,
                    started_at: parse_timestamp(&date)?,
                })
            })
            .collect()
    }

    fn delete_task(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM pomodoro WHERE task = ?1 AND date = ?2",
            params![name, format_timestamp(started_at)],
        )?;
        debug!("Deleted {} row(s) for task '{}'", deleted, name);
        Ok(())
    }

    fn exists_on_date(&self, name: &str, date: NaiveDate) -> Result<bool, StoreError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pomodoro WHERE task = ?1 AND date LIKE ?2)",
            params![name, date_prefix(date)],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }
}

fn date_prefix(date: NaiveDate) -> String {
    format!("{}%", date.format(DATE_FORMAT))
}

pub(crate) fn format_timestamp(at: DateTime<Local>) -> String {
    at.naive_local().format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored start time, with or without fractional seconds.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Local>, StoreError> {
    let invalid = || StoreError::InvalidTimestamp {
        value: value.to_string(),
    };
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_PARSE_FORMAT).map_err(|_| invalid())?;
    Local.from_local_datetime(&naive).earliest().ok_or_else(invalid)
}
