//! Terminal front end
//!
//! Drives a session controller from stdin and prints the task log.

pub mod handlers;
pub mod input;
pub mod render;

pub use handlers::{delete_task, run_session, seed, show_log};
