//! State module
//!
//! Countdown state machine and the session record it produces.

pub mod countdown;
pub mod session;

pub use countdown::{format_remaining, Countdown, TickOutcome, TimerState};
pub use session::SessionRecord;
