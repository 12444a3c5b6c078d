//! Text output for the terminal front end

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    engine::EngineSnapshot,
    error::StoreError,
    state::{format_remaining, SessionRecord},
    store::TaskStore,
};

/// Tasks recorded on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayLog {
    pub date: NaiveDate,
    pub tasks: Vec<SessionRecord>,
}

/// Load the task log, newest day first. `only` restricts it to a single day.
pub fn collect_history<S: TaskStore>(
    store: &S,
    only: Option<NaiveDate>,
) -> Result<Vec<DayLog>, StoreError> {
    let dates = match only {
        Some(date) => vec![date],
        None => store.list_unique_dates()?,
    };

    let mut days = Vec::with_capacity(dates.len());
    for date in dates {
        let tasks = store.list_tasks_by_date(date)?;
        if !tasks.is_empty() {
            days.push(DayLog { date, tasks });
        }
    }
    Ok(days)
}

pub fn render_history(days: &[DayLog]) -> String {
    if days.is_empty() {
        return "No tasks recorded yet.\n".to_string();
    }

    let mut out = String::new();
    for day in days {
        out.push_str(&format!("{}\n", day.date.format("%Y-%m-%d")));
        for task in &day.tasks {
            out.push_str(&format!(
                "  {} | {} | {}\n",
                task.task_name,
                if task.completed_full { "full" } else { "-" },
                task.started_at.format("%H:%M:%S"),
            ));
        }
    }
    out
}

pub fn render_status(record: &SessionRecord, snapshot: &EngineSnapshot) -> String {
    let mut status = format!(
        "{} [{}] {} left",
        record.task_name,
        snapshot.state,
        format_remaining(snapshot.remaining)
    );
    if !snapshot.accumulated_pause.is_zero() {
        status.push_str(&format!(
            ", paused {}",
            format_remaining(snapshot.accumulated_pause)
        ));
    }
    status
}
