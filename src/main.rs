//! Focus Timer - single-task countdown with a daily task log
//!
//! This is the main entry point for the focus-timer application.

use std::time::Duration;
use tracing::info;

use focus_timer::{
    cli,
    config::{Config, Mode, TimerConfig},
    store::SqliteTaskStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the countdown owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Task database: {}", config.db.display());

    match config.command {
        Mode::Run { task, minutes, tick_ms } => {
            let store = SqliteTaskStore::open(&config.db)?;
            let timer = TimerConfig::minutes(minutes)
                .with_tick_interval(Duration::from_millis(tick_ms));
            if let Err(e) = cli::run_session(store, &task, timer).await {
                tracing::error!("{}", e);
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        Mode::Log { date, json } => {
            let store = SqliteTaskStore::open(&config.db)?;
            cli::show_log(&store, date, json)?;
        }
        Mode::Delete { task, started_at } => {
            let store = SqliteTaskStore::open(&config.db)?;
            cli::delete_task(&store, &task, &started_at)?;
        }
        Mode::Seed { days, per_day } => {
            cli::seed(&config.db, days, per_day)?;
        }
    }

    info!("focus-timer exiting");
    Ok(())
}
