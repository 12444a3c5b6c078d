//! Countdown background task

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::watch,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    clock::Clock,
    controller::TimerListener,
    engine::lock,
    state::{Countdown, TickOutcome},
};

/// Flags the owning engine when the task ends, including on abort or panic.
pub(crate) struct StoppedGuard(pub(crate) watch::Sender<bool>);

impl Drop for StoppedGuard {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

/// Everything the tick task needs from its engine
pub(crate) struct TickContext {
    pub countdown: Arc<Mutex<Countdown>>,
    pub delivery: Arc<Mutex<()>>,
    pub clock: Arc<dyn Clock>,
    pub listener: Arc<dyn TimerListener>,
    pub tick_interval: Duration,
    pub wake_rx: watch::Receiver<()>,
    pub stopped: StoppedGuard,
}

/// Background task that evaluates the countdown once per tick interval.
///
/// Commands wake the task early so cancellation and early finish are seen
/// immediately. The task is the only place callbacks are fired from.
/// Each evaluation and its callback run under the engine's delivery lock, so
/// a command that takes the same lock never races an in-flight callback.
pub(crate) async fn tick_loop(ctx: TickContext) {
    let TickContext {
        countdown,
        delivery,
        clock,
        listener,
        tick_interval,
        mut wake_rx,
        stopped: _stopped,
    } = ctx;

    debug!("Starting countdown task, tick every {:?}", tick_interval);

    let mut interval = time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = wake_rx.changed() => {
                if changed.is_err() {
                    // Engine handle is gone, nobody can stop us later
                    if lock(&countdown).cancel() {
                        debug!("Engine dropped mid-countdown, cancelling");
                    }
                }
            }
        }

        if !deliver(&countdown, &delivery, clock.as_ref(), listener.as_ref()) {
            break;
        }
    }

    debug!("Countdown task stopped");
}

/// Evaluate the countdown once and fire the matching callback.
///
/// Returns false once the loop should stop.
fn deliver(
    countdown: &Mutex<Countdown>,
    delivery: &Mutex<()>,
    clock: &dyn Clock,
    listener: &dyn TimerListener,
) -> bool {
    let _delivery = lock(delivery);
    let outcome = lock(countdown).poll(clock.now());
    match outcome {
        TickOutcome::Tick(label) => listener.on_tick(&label),
        TickOutcome::Skip => {}
        TickOutcome::Finished { early } => {
            info!("Countdown finished (early: {})", early);
            listener.on_finish(early);
            return false;
        }
        TickOutcome::Stop => {
            info!("Countdown cancelled, stopping task");
            return false;
        }
    }
    true
}
