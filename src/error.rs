//! Error types for the focus timer.
//!
//! Every command returns one of these as an explicit value. Nothing in the
//! timer core panics on a rejected command.

use std::{path::PathBuf, time::Duration};
use thiserror::Error;

use crate::state::TimerState;

/// Commands a controller can issue to a [`crate::TimerEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    FinishEarly,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::FinishEarly => "finish early",
        };
        f.write_str(name)
    }
}

/// A command was issued from a state that does not permit it.
///
/// The countdown is left untouched when this is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {command} while timer is {state}")]
pub struct TransitionError {
    pub command: Command,
    pub state: TimerState,
}

/// Errors from starting or tearing down an engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Countdown durations must be greater than zero
    #[error("countdown duration must be greater than zero")]
    ZeroDuration,

    /// The deadline would not fit on the monotonic clock
    #[error("countdown duration {0:?} is too long")]
    DurationTooLong(Duration),

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    /// `start` was called outside of a tokio runtime
    #[error("no tokio runtime available to run the countdown")]
    NoRuntime,

    /// The tick task terminated abnormally
    #[error("countdown task panicked: {0}")]
    LoopPanicked(String),
}

/// Task name checks performed before a countdown is started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task name")]
    EmptyTaskName,

    #[error("Task '{0}' was already performed today, please enter a different task name")]
    DuplicateTask(String),
}

/// Task store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored timestamp could not be interpreted
    #[error("Invalid timestamp '{value}' in task store")]
    InvalidTimestamp { value: String },

    #[error("Failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the session controller.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no task is currently running")]
    NoActiveSession,
}

pub type Result<T, E = ControllerError> = std::result::Result<T, E>;
