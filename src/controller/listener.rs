//! Callback surface the engine reports through

use tokio::sync::mpsc;
use tracing::debug;

/// Receives countdown progress from the engine's background task.
///
/// Both methods run on the tick task, so they must return quickly and must
/// not block. Commands wait for an in-flight callback to return, so a
/// callback must not pause, finish or force quit its own engine. Controllers
/// that own single-threaded state should use [`ChannelListener`] to move the
/// calls onto their own task.
pub trait TimerListener: Send + Sync + 'static {
    /// Remaining time as `MM:SS`, once per tick while running
    fn on_tick(&self, remaining: &str);

    /// Called exactly once when the countdown ends, never on force quit
    fn on_finish(&self, early: bool);
}

/// Engine callback, as delivered to the controller's task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Tick(String),
    Finished { early: bool },
}

/// Forwards engine callbacks over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl ChannelListener {
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { tx }
    }

    /// Create a listener together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, event: TimerEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("Controller no longer listening, dropped {:?}", e.0);
        }
    }
}

impl TimerListener for ChannelListener {
    fn on_tick(&self, remaining: &str) {
        self.forward(TimerEvent::Tick(remaining.to_string()));
    }

    fn on_finish(&self, early: bool) {
        self.forward(TimerEvent::Finished { early });
    }
}
