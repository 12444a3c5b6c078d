//! Countdown engine
//!
//! A [`TimerEngine`] runs one countdown on a background tokio task and accepts
//! commands from its controller without ever blocking on that task. Engines
//! are single use: once finished or cancelled, start a new one.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use serde::Serialize;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    controller::TimerListener,
    error::{EngineError, TransitionError},
    state::{Countdown, TimerState},
    tasks::{tick_loop, StoppedGuard, TickContext},
};

/// Default interval between two countdown evaluations
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Point-in-time view of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    pub state: TimerState,
    pub remaining: Duration,
    pub accumulated_pause: Duration,
}

/// Handle on the spawned tick task
struct TickTask {
    handle: JoinHandle<()>,
    stopped: watch::Receiver<bool>,
}

pub struct TimerEngine {
    countdown: Arc<Mutex<Countdown>>,
    /// Held by the tick task while it evaluates and calls the listener
    delivery: Arc<Mutex<()>>,
    clock: Arc<dyn Clock>,
    listener: Arc<dyn TimerListener>,
    tick_interval: Duration,
    wake_tx: watch::Sender<()>,
    task: Mutex<Option<TickTask>>,
}

impl TimerEngine {
    /// Create an idle engine reporting to `listener`
    pub fn new(listener: Arc<dyn TimerListener>) -> Self {
        let (wake_tx, _) = watch::channel(());
        Self {
            countdown: Arc::new(Mutex::new(Countdown::new())),
            delivery: Arc::new(Mutex::new(())),
            clock: Arc::new(SystemClock),
            listener,
            tick_interval: DEFAULT_TICK_INTERVAL,
            wake_tx,
            task: Mutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn state(&self) -> TimerState {
        lock(&self.countdown).state()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let countdown = lock(&self.countdown);
        EngineSnapshot {
            state: countdown.state(),
            remaining: countdown.remaining(self.clock.now()),
            accumulated_pause: countdown.accumulated_pause(),
        }
    }

    /// Start counting down `duration` on a background task of the current runtime.
    pub fn start(&self, duration: Duration) -> Result<(), EngineError> {
        if duration.is_zero() {
            return Err(EngineError::ZeroDuration);
        }
        if self.tick_interval.is_zero() {
            return Err(EngineError::ZeroTickInterval);
        }
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let now = self.clock.now();
        let end_at = now
            .checked_add(duration)
            .ok_or(EngineError::DurationTooLong(duration))?;
        lock(&self.countdown).start(now, end_at)?;

        let (stopped_tx, stopped_rx) = watch::channel(false);
        let ctx = TickContext {
            countdown: Arc::clone(&self.countdown),
            delivery: Arc::clone(&self.delivery),
            clock: Arc::clone(&self.clock),
            listener: Arc::clone(&self.listener),
            tick_interval: self.tick_interval,
            wake_rx: self.wake_tx.subscribe(),
            stopped: StoppedGuard(stopped_tx),
        };
        let handle = runtime.spawn(tick_loop(ctx));

        *lock(&self.task) = Some(TickTask {
            handle,
            stopped: stopped_rx,
        });

        info!("Countdown started for {:?}", duration);
        Ok(())
    }

    /// Pause a running countdown. No tick is delivered after this returns.
    pub fn pause(&self) -> Result<(), TransitionError> {
        let _delivery = lock(&self.delivery);
        lock(&self.countdown).pause(self.clock.now())?;
        self.wake();
        info!("Countdown paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), TransitionError> {
        let paused_for = lock(&self.countdown).resume(self.clock.now())?;
        self.wake();
        info!("Countdown resumed after {:?} paused", paused_for);
        Ok(())
    }

    /// Finish before the countdown elapses. The listener gets `on_finish(true)`.
    pub fn finish_early(&self) -> Result<(), TransitionError> {
        let _delivery = lock(&self.delivery);
        lock(&self.countdown).finish_early()?;
        self.wake();
        info!("Countdown finished early");
        Ok(())
    }

    /// Cancel the countdown unconditionally.
    ///
    /// Never fires `on_finish`, and is a no-op on a terminal engine. No
    /// callback is delivered once this returns. The tick task observes the
    /// cancellation as soon as it is woken, use
    /// [`wait_stopped`](Self::wait_stopped) to confirm it has exited.
    pub fn force_quit(&self) {
        let _delivery = lock(&self.delivery);
        if lock(&self.countdown).cancel() {
            info!("Countdown force quit");
        } else {
            debug!("Force quit on a terminal engine ignored");
        }
        self.wake();
    }

    /// Whether no tick task is running for this engine
    pub fn is_stopped(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .map_or(true, |task| task.handle.is_finished())
    }

    /// Wait until the tick task has exited.
    ///
    /// Returns immediately for an engine that was never started. Safe to
    /// call again if a previous wait was abandoned.
    pub async fn wait_stopped(&self) -> Result<(), EngineError> {
        let stopped = lock(&self.task).as_ref().map(|task| task.stopped.clone());
        let Some(mut stopped) = stopped else {
            return Ok(());
        };

        // A dropped sender also means the task is gone.
        let _ = stopped.wait_for(|stopped| *stopped).await;

        let task = lock(&self.task).take();
        if let Some(task) = task {
            if let Err(e) = task.handle.await {
                if e.is_panic() {
                    return Err(EngineError::LoopPanicked(e.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Force quit and wait for the tick task to exit
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.force_quit();
        self.wait_stopped().await
    }

    fn wake(&self) {
        self.wake_tx.send_modify(|_| {});
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        let task = lock(&self.task).take();
        if let Some(task) = task {
            if !task.handle.is_finished() {
                warn!("Countdown engine dropped while its task was running, aborting it");
                lock(&self.countdown).cancel();
                task.handle.abort();
            }
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
