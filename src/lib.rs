//! Focus Timer - a single-task countdown for focused work intervals
//!
//! The countdown engine runs on its own tokio task and can be paused,
//! resumed, finished early or force quit from the controlling side. A session
//! controller records each started task in a SQLite task log.

pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod state;
pub mod store;
pub mod utils;

mod tasks;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::{Config, TimerConfig};
pub use controller::{ChannelListener, SessionController, SessionUpdate, TimerEvent, TimerListener};
pub use engine::{EngineSnapshot, TimerEngine};
pub use error::{ControllerError, EngineError, StoreError, TransitionError, ValidationError};
pub use state::{SessionRecord, TimerState};
pub use store::{SqliteTaskStore, TaskStore};
pub use utils::signals::shutdown_signal;
