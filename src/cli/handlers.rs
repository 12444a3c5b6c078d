//! Subcommand handlers

use std::{
    io::Write,
    path::Path,
};

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use super::{
    input::{ConsoleCommand, HELP},
    render::{collect_history, render_history, render_status},
};
use crate::{
    config::TimerConfig,
    controller::{SessionController, SessionUpdate},
    store::{
        sample::{backup_existing, seed_sample_tasks},
        sqlite::parse_timestamp,
        SqliteTaskStore, TaskStore,
    },
    utils::shutdown_signal,
};

/// Run one focus session in the terminal until it finishes or is abandoned.
pub async fn run_session(
    store: SqliteTaskStore,
    task: &str,
    config: TimerConfig,
) -> anyhow::Result<()> {
    let mut controller = SessionController::new(store, config);
    let record = controller.start_task(task)?.clone();

    println!(
        "Focusing on '{}' for {} minute(s). {}",
        record.task_name,
        config.duration.as_secs() / 60,
        HELP
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = controller.next_event() => {
                match controller.handle_event(event).await? {
                    SessionUpdate::Tick(label) => print_label(&label),
                    SessionUpdate::Finished { record, early } => {
                        println!();
                        if early {
                            println!("Task '{}' finished early.", record.task_name);
                        } else {
                            println!("Task finished. Take a 5 minute break!");
                        }
                        return Ok(());
                    }
                }
            }

            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if apply_command(&controller, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("stdin closed, countdown continues");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read command: {}", e);
                        stdin_open = false;
                    }
                }
            }

            _ = &mut shutdown => {
                break;
            }
        }
    }

    if let Some(record) = controller.shutdown().await? {
        println!();
        println!("Task '{}' stopped without completing.", record.task_name);
    }
    Ok(())
}

/// Apply one console command. Returns true when the user asked to quit.
fn apply_command<S: TaskStore>(controller: &SessionController<S>, line: &str) -> bool {
    let command = match line.parse::<ConsoleCommand>() {
        Ok(command) => command,
        Err(message) => {
            println!("{}", message);
            return false;
        }
    };

    let result = match command {
        ConsoleCommand::Pause => controller.pause(),
        ConsoleCommand::Resume => controller.resume(),
        ConsoleCommand::Toggle => controller.toggle_pause().map(|_| ()),
        ConsoleCommand::Finish => controller.finish_early(),
        ConsoleCommand::Quit => return true,
        ConsoleCommand::Status => {
            if let (Some(record), Some(snapshot)) =
                (controller.active_record(), controller.snapshot())
            {
                println!("{}", render_status(record, &snapshot));
            }
            Ok(())
        }
        ConsoleCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
    };

    if let Err(e) = result {
        println!("{}", e);
    }
    false
}

fn print_label(label: &str) {
    let mut stdout = std::io::stdout();
    if let Err(e) = write!(stdout, "\r{}  ", label).and_then(|_| stdout.flush()) {
        error!("Failed to update display: {}", e);
    }
}

/// Print the task log, or one day of it
pub fn show_log(store: &SqliteTaskStore, date: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let days = collect_history(store, date)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        print!("{}", render_history(&days));
    }
    Ok(())
}

pub fn delete_task(store: &SqliteTaskStore, task: &str, started_at: &str) -> anyhow::Result<()> {
    let started_at = parse_timestamp(started_at)?;
    if !store
        .list_tasks_by_date(started_at.date_naive())?
        .iter()
        .any(|record| record.task_name == task && record.started_at == started_at)
    {
        anyhow::bail!("no task '{}' started at {}", task, started_at.format("%Y-%m-%d %H:%M:%S%.f"));
    }
    store.delete_task(task, started_at)?;
    println!("Deleted '{}'", task);
    Ok(())
}

/// Replace the database at `path` with sample history ending today.
pub fn seed(path: &Path, days: u32, per_day: u32) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    if let Some(backup) = backup_existing(path, today)? {
        println!("Existing database moved to {}", backup.display());
    }

    let store = SqliteTaskStore::open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let first_day = today - Duration::days(i64::from(days.saturating_sub(1)));
    let inserted = seed_sample_tasks(&store, first_day, days, per_day, &mut rand::thread_rng())?;

    info!("Seeded {}", path.display());
    println!("Wrote {} sample task(s) to {}", inserted, path.display());
    Ok(())
}
