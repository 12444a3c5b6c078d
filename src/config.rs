//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::engine::DEFAULT_TICK_INTERVAL;

/// Countdown length of a standard focus interval, in minutes
pub const DEFAULT_FOCUS_MINUTES: u64 = 25;

/// Longest countdown the CLI accepts, one day
pub const MAX_FOCUS_MINUTES: u64 = 24 * 60;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "Single-task focus timer with a daily task log")]
#[command(version)]
pub struct Config {
    /// Path of the task database
    #[arg(long, global = true, default_value = "pomodoro.db")]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Count down a focus interval for one task
    Run {
        /// Name of the task, unique per day
        task: String,

        /// Countdown length in minutes
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_FOCUS_MINUTES,
            value_parser = clap::value_parser!(u64).range(1..=MAX_FOCUS_MINUTES)
        )]
        minutes: u64,

        /// Milliseconds between display updates
        #[arg(
            long,
            default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64,
            value_parser = clap::value_parser!(u64).range(1..=60_000)
        )]
        tick_ms: u64,
    },

    /// Show recorded tasks, most recent day first
    Log {
        /// Only show this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete one recorded task
    Delete {
        /// Task name
        task: String,

        /// Start time as shown by `log`, e.g. "2024-03-01 09:00:00.250000"
        started_at: String,
    },

    /// Write a sample database, backing up any existing one
    Seed {
        #[arg(long, default_value_t = 3)]
        days: u32,

        #[arg(long, default_value_t = 10)]
        per_day: u32,
    },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Engine settings for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub duration: Duration,
    pub tick_interval: Duration,
}

impl TimerConfig {
    pub fn minutes(minutes: u64) -> Self {
        Self {
            duration: Duration::from_secs(minutes.saturating_mul(60)),
            ..Self::default()
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(DEFAULT_FOCUS_MINUTES * 60),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
