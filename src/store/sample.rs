//! Sample task history for demos and manual testing

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use rand::Rng;
use tracing::info;

use super::SqliteTaskStore;
use crate::{error::StoreError, state::SessionRecord};

/// Move an existing database aside as `<stem>_backup(MM-DD-YYYY).<ext>`.
///
/// Returns the backup path, or `None` when there was nothing to back up.
pub fn backup_existing(path: &Path, today: NaiveDate) -> Result<Option<PathBuf>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pomodoro".to_string());
    let mut file_name = format!("{}_backup({})", stem, today.format("%m-%d-%Y"));
    if let Some(ext) = path.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }
    let backup = path.with_file_name(file_name);

    std::fs::rename(path, &backup).map_err(|source| StoreError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Backed up {} to {}", path.display(), backup.display());
    Ok(Some(backup))
}

/// Fill `store` with `per_day` hourly tasks from 08:30 on each of `days`
/// consecutive days starting at `first_day`. Completion is random.
pub fn seed_sample_tasks<R: Rng>(
    store: &SqliteTaskStore,
    first_day: NaiveDate,
    days: u32,
    per_day: u32,
    rng: &mut R,
) -> Result<usize, StoreError> {
    let first_start = NaiveTime::from_hms_micro_opt(8, 30, 0, 342_380).unwrap_or_default();
    let mut inserted = 0;

    for day in 0..days {
        let date = first_day + Duration::days(i64::from(day));
        let mut naive = date.and_time(first_start);

        for n in 1..=per_day {
            if let Some(started_at) = Local.from_local_datetime(&naive).earliest() {
                store.insert_record(&SessionRecord {
                    task_name: format!("Sample Task {}", n),
                    started_at,
                    completed_full: rng.gen_bool(0.5),
                })?;
                inserted += 1;
            }
            naive += Duration::hours(1);
        }
    }

    info!("Inserted {} sample tasks over {} day(s)", inserted, days);
    Ok(inserted)
}
