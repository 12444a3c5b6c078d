//! Time sources.
//!
//! Intervals are measured on a monotonic clock. The wall clock is only read
//! for timestamps that end up in the task store.

use chrono::{DateTime, Local, NaiveDate};
use tokio::time::Instant;

pub trait Clock: Send + Sync {
    /// Monotonic instant used for all countdown arithmetic
    fn now(&self) -> Instant;

    /// Wall-clock time used for persisted session starts
    fn wall_now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.wall_now().date_naive()
    }
}

/// Clock backed by the tokio timer and the local system time.
///
/// `tokio::time::Instant` follows the runtime clock, so a runtime with paused
/// time drives countdowns deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> DateTime<Local> {
        Local::now()
    }
}
