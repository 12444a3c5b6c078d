//! Controller side of the countdown
//!
//! The listener contract the engine reports through, and the session
//! controller that turns engine events into task store updates.

pub mod listener;
pub mod session_controller;

pub use listener::{ChannelListener, TimerEvent, TimerListener};
pub use session_controller::{SessionController, SessionUpdate};
