//! Background tasks module
//!
//! The countdown tick loop runs here, apart from whoever drives the engine.

pub(crate) mod tick_loop;

pub(crate) use tick_loop::{tick_loop, StoppedGuard, TickContext};
