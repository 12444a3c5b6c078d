//! Task persistence
//!
//! The controller records every started task through a [`TaskStore`]. The
//! countdown engine never touches the store.

pub mod sample;
pub mod sqlite;

use chrono::{DateTime, Local, NaiveDate};

use crate::{clock::Clock, error::StoreError, state::SessionRecord};

pub use sqlite::SqliteTaskStore;

pub trait TaskStore {
    /// Record a newly started task as not completed
    fn insert_task(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError>;

    /// Flag the task started at `started_at` as having run its full duration
    fn mark_finished_full(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError>;

    /// Every date with at least one task, most recent first
    fn list_unique_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;

    fn list_tasks_by_date(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StoreError>;

    fn delete_task(&self, name: &str, started_at: DateTime<Local>) -> Result<(), StoreError>;

    fn exists_on_date(&self, name: &str, date: NaiveDate) -> Result<bool, StoreError>;

    /// Task names are unique per calendar day, "today" as `clock` sees it
    fn exists_for_today(&self, name: &str, clock: &dyn Clock) -> Result<bool, StoreError> {
        self.exists_on_date(name, clock.today())
    }
}
