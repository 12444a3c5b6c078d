//! Session controller
//!
//! Validates task names, owns the active engine, and records sessions in the
//! task store as engine events arrive on the controller's own task.

use std::sync::Arc;

use chrono::{DateTime, Local, SubsecRound};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::listener::{ChannelListener, TimerEvent};
use crate::{
    clock::{Clock, SystemClock},
    config::TimerConfig,
    engine::{EngineSnapshot, TimerEngine},
    error::{Command, ControllerError, Result, TransitionError, ValidationError},
    state::{SessionRecord, TimerState},
    store::TaskStore,
};

/// What the controller made of an engine event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// New remaining-time label
    Tick(String),
    /// The session ended and the store has been updated
    Finished { record: SessionRecord, early: bool },
}

struct ActiveSession {
    engine: TimerEngine,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    record: SessionRecord,
    last_label: Option<String>,
}

pub struct SessionController<S: TaskStore> {
    store: S,
    clock: Arc<dyn Clock>,
    config: TimerConfig,
    active: Option<ActiveSession>,
}

impl<S: TaskStore> SessionController<S> {
    pub fn new(store: S, config: TimerConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
            active: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Check a task name before anything is started
    pub fn validate_task_name<'a>(&self, name: &'a str) -> Result<&'a str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName.into());
        }
        if self.store.exists_for_today(name, self.clock.as_ref())? {
            return Err(ValidationError::DuplicateTask(name.to_string()).into());
        }
        Ok(name)
    }

    /// Validate `name`, start a countdown for it and record the session.
    pub fn start_task(&mut self, name: &str) -> Result<&SessionRecord> {
        if let Some(active) = &self.active {
            return Err(TransitionError {
                command: Command::Start,
                state: active.engine.state(),
            }
            .into());
        }
        let name = self.validate_task_name(name)?.to_string();

        let (listener, events) = ChannelListener::channel();
        let engine = TimerEngine::new(Arc::new(listener))
            .with_clock(Arc::clone(&self.clock))
            .with_tick_interval(self.config.tick_interval);
        engine.start(self.config.duration)?;

        // Same precision the store keeps
        let started_at = self.clock.wall_now().trunc_subsecs(6);
        if let Err(e) = self.store.insert_task(&name, started_at) {
            // Dropping the engine aborts its task
            engine.force_quit();
            return Err(e.into());
        }

        info!("Started task '{}' for {:?}", name, self.config.duration);
        let session = self.active.insert(ActiveSession {
            engine,
            events,
            record: SessionRecord::started(name, started_at),
            last_label: None,
        });
        Ok(&session.record)
    }

    pub fn pause(&self) -> Result<()> {
        Ok(self.engine()?.pause()?)
    }

    pub fn resume(&self) -> Result<()> {
        Ok(self.engine()?.resume()?)
    }

    /// Pause a running countdown or resume a paused one
    pub fn toggle_pause(&self) -> Result<TimerState> {
        let engine = self.engine()?;
        match engine.state() {
            TimerState::Paused => engine.resume()?,
            _ => engine.pause()?,
        }
        Ok(engine.state())
    }

    pub fn finish_early(&self) -> Result<()> {
        Ok(self.engine()?.finish_early()?)
    }

    pub fn active_record(&self) -> Option<&SessionRecord> {
        self.active.as_ref().map(|active| &active.record)
    }

    pub fn last_label(&self) -> Option<&str> {
        self.active.as_ref()?.last_label.as_deref()
    }

    pub fn snapshot(&self) -> Option<EngineSnapshot> {
        self.active.as_ref().map(|active| active.engine.snapshot())
    }

    /// Next engine event, or `None` when no session is active.
    ///
    /// Cancel safe, so it can be raced in `tokio::select!`.
    pub async fn next_event(&mut self) -> Option<TimerEvent> {
        self.active.as_mut()?.events.recv().await
    }

    /// Apply an engine event. A finish waits for the engine's task to exit,
    /// records full completion and clears the active session.
    pub async fn handle_event(&mut self, event: TimerEvent) -> Result<SessionUpdate> {
        match event {
            TimerEvent::Tick(label) => {
                if let Some(active) = self.active.as_mut() {
                    active.last_label = Some(label.clone());
                }
                Ok(SessionUpdate::Tick(label))
            }
            TimerEvent::Finished { early } => {
                let active = self.active.take().ok_or(ControllerError::NoActiveSession)?;
                active.engine.wait_stopped().await?;

                let mut record = active.record;
                if !early {
                    self.store
                        .mark_finished_full(&record.task_name, record.started_at)?;
                    record.completed_full = true;
                }
                info!(
                    "Task '{}' finished ({})",
                    record.task_name,
                    if early { "early" } else { "full" }
                );
                Ok(SessionUpdate::Finished { record, early })
            }
        }
    }

    /// Force quit any active countdown and wait for its task to stop.
    ///
    /// The session keeps its initial record and is not marked complete.
    pub async fn shutdown(&mut self) -> Result<Option<SessionRecord>> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };
        active.engine.shutdown().await?;
        warn!("Task '{}' abandoned", active.record.task_name);
        Ok(Some(active.record))
    }

    pub fn delete_task(&self, name: &str, started_at: DateTime<Local>) -> Result<()> {
        Ok(self.store.delete_task(name, started_at)?)
    }

    fn engine(&self) -> Result<&TimerEngine> {
        self.active
            .as_ref()
            .map(|active| &active.engine)
            .ok_or(ControllerError::NoActiveSession)
    }
}
