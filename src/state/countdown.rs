//! Countdown state machine
//!
//! Pure transition logic with every instant passed in by the caller. The
//! engine wraps a [`Countdown`] in a mutex and drives it from both the
//! command surface and the tick loop.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::error::{Command, TransitionError};

/// Lifecycle of a single countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    FinishedEarly,
    FinishedFull,
    Cancelled,
}

impl TimerState {
    /// Terminal states never change again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TimerState::FinishedEarly | TimerState::FinishedFull | TimerState::Cancelled
        )
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::FinishedEarly => "finished early",
            TimerState::FinishedFull => "finished",
            TimerState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// What the tick loop should do after one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running, emit this `MM:SS` label
    Tick(String),
    /// Paused (or not started): emit nothing this cycle
    Skip,
    /// Countdown ended, report it and stop the loop
    Finished { early: bool },
    /// Cancelled or already reported, stop without a callback
    Stop,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    state: TimerState,
    started_at: Option<Instant>,
    end_at: Option<Instant>,
    /// Set exactly while `state == Paused`
    paused_at: Option<Instant>,
    accumulated_pause: Duration,
    finish_reported: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            started_at: None,
            end_at: None,
            paused_at: None,
            accumulated_pause: Duration::ZERO,
            finish_reported: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn end_at(&self) -> Option<Instant> {
        self.end_at
    }

    pub fn paused_at(&self) -> Option<Instant> {
        self.paused_at
    }

    pub fn accumulated_pause(&self) -> Duration {
        self.accumulated_pause
    }

    /// Time left on the countdown as seen at `now`.
    ///
    /// Frozen while paused, zero before start and after termination.
    pub fn remaining(&self, now: Instant) -> Duration {
        match (self.state, self.end_at) {
            (TimerState::Running, Some(end_at)) => end_at.saturating_duration_since(now),
            (TimerState::Paused, Some(end_at)) => {
                let paused_at = self.paused_at.unwrap_or(now);
                end_at.saturating_duration_since(paused_at)
            }
            _ => Duration::ZERO,
        }
    }

    /// Start counting down from `now` towards `end_at`.
    ///
    /// The caller computes `end_at` so an unrepresentable deadline is
    /// rejected before the countdown changes.
    pub fn start(&mut self, now: Instant, end_at: Instant) -> Result<(), TransitionError> {
        self.expect(Command::Start, TimerState::Idle)?;
        self.state = TimerState::Running;
        self.started_at = Some(now);
        self.end_at = Some(end_at);
        Ok(())
    }

    pub fn pause(&mut self, now: Instant) -> Result<(), TransitionError> {
        self.expect(Command::Pause, TimerState::Running)?;
        self.state = TimerState::Paused;
        self.paused_at = Some(now);
        Ok(())
    }

    /// Folds the paused interval into `end_at` so remaining time stays a
    /// single subtraction.
    pub fn resume(&mut self, now: Instant) -> Result<Duration, TransitionError> {
        self.expect(Command::Resume, TimerState::Paused)?;
        let paused_for = self
            .paused_at
            .take()
            .map(|paused_at| now.saturating_duration_since(paused_at))
            .unwrap_or_default();
        // A deadline pushed past the clock's range stays where it is
        if let Some(end_at) = self.end_at.as_mut() {
            if let Some(shifted) = end_at.checked_add(paused_for) {
                *end_at = shifted;
            }
        }
        self.accumulated_pause += paused_for;
        self.state = TimerState::Running;
        Ok(paused_for)
    }

    pub fn finish_early(&mut self) -> Result<(), TransitionError> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::FinishedEarly;
                self.paused_at = None;
                Ok(())
            }
            state => Err(TransitionError {
                command: Command::FinishEarly,
                state,
            }),
        }
    }

    /// Returns whether the countdown changed; terminal countdowns are left alone.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = TimerState::Cancelled;
        self.paused_at = None;
        true
    }

    /// One evaluation of the tick algorithm.
    pub fn poll(&mut self, now: Instant) -> TickOutcome {
        match self.state {
            TimerState::Idle | TimerState::Paused => TickOutcome::Skip,
            TimerState::Cancelled => TickOutcome::Stop,
            TimerState::Running => {
                let remaining = self.remaining(now);
                if remaining.is_zero() {
                    self.state = TimerState::FinishedFull;
                    self.report_finish(false)
                } else {
                    TickOutcome::Tick(format_remaining(remaining))
                }
            }
            TimerState::FinishedEarly => self.report_finish(true),
            TimerState::FinishedFull => self.report_finish(false),
        }
    }

    fn report_finish(&mut self, early: bool) -> TickOutcome {
        if self.finish_reported {
            return TickOutcome::Stop;
        }
        self.finish_reported = true;
        TickOutcome::Finished { early }
    }

    fn expect(&self, command: Command, required: TimerState) -> Result<(), TransitionError> {
        if self.state == required {
            Ok(())
        } else {
            Err(TransitionError {
                command,
                state: self.state,
            })
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a remaining duration as zero-padded `MM:SS`, flooring to whole seconds.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
