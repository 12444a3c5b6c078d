//! Persisted description of one task attempt

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One work interval as written to the task store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Task name, unique per calendar day
    pub task_name: String,
    /// Wall-clock start of the session
    pub started_at: DateTime<Local>,
    /// True only when the countdown ran to its natural end
    pub completed_full: bool,
}

impl SessionRecord {
    /// A freshly started session, not yet completed
    pub fn started(task_name: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self {
            task_name: task_name.into(),
            started_at,
            completed_full: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}
