//! End-to-end countdown behaviour on a paused tokio clock.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use focus_timer::{TimerEngine, TimerEvent, TimerListener, TimerState};
use tokio::time::{sleep, timeout, Instant};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(Instant, TimerEvent)>>,
}

impl Recorder {
    fn events(&self) -> Vec<(Instant, TimerEvent)> {
        self.events.lock().unwrap().clone()
    }

    fn labels(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|(_, event)| match event {
                TimerEvent::Tick(label) => Some(label),
                TimerEvent::Finished { .. } => None,
            })
            .collect()
    }

    fn finishes(&self) -> Vec<(Instant, bool)> {
        self.events()
            .into_iter()
            .filter_map(|(at, event)| match event {
                TimerEvent::Finished { early } => Some((at, early)),
                TimerEvent::Tick(_) => None,
            })
            .collect()
    }
}

impl TimerListener for Recorder {
    fn on_tick(&self, remaining: &str) {
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), TimerEvent::Tick(remaining.to_string())));
    }

    fn on_finish(&self, early: bool) {
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), TimerEvent::Finished { early }));
    }
}

fn engine() -> (TimerEngine, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    (TimerEngine::new(recorder.clone()), recorder)
}

fn secs(n: f64) -> Duration {
    Duration::from_secs_f64(n)
}

#[tokio::test(start_paused = true)]
async fn two_second_countdown_finishes_once() {
    let (engine, recorder) = engine();
    engine.start(secs(2.0)).unwrap();
    sleep(secs(2.3)).await;

    let finishes = recorder.finishes();
    assert_eq!(finishes.len(), 1);
    assert!(!finishes[0].1);
    assert_eq!(engine.state(), TimerState::FinishedFull);

    let mut labels = recorder.labels();
    labels.dedup();
    assert_eq!(labels[..2], ["00:02", "00:01"]);
    assert!(labels.windows(2).all(|pair| pair[0] > pair[1]));

    // Finish is the last thing the listener ever hears.
    let events = recorder.events();
    assert!(matches!(events.last(), Some((_, TimerEvent::Finished { early: false }))));
    sleep(secs(5.0)).await;
    assert_eq!(recorder.events().len(), events.len());
    assert!(engine.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn ticks_arrive_in_time_order() {
    let (engine, recorder) = engine();
    engine.start(secs(3.0)).unwrap();
    sleep(secs(1.0)).await;
    engine.pause().unwrap();
    sleep(secs(0.7)).await;
    engine.resume().unwrap();
    sleep(secs(3.0)).await;

    let events = recorder.events();
    assert!(events.windows(2).all(|pair| pair[0].0 <= pair[1].0));
}

#[tokio::test(start_paused = true)]
async fn pause_extends_finish_time() {
    let (engine, recorder) = engine();
    let started = Instant::now();
    engine.start(secs(5.0)).unwrap();

    sleep(secs(1.0)).await;
    engine.pause().unwrap();
    sleep(secs(2.0)).await;
    engine.resume().unwrap();

    sleep(secs(3.5)).await;
    assert!(recorder.finishes().is_empty(), "finished before paused time was made up");

    sleep(secs(1.0)).await;
    let finishes = recorder.finishes();
    assert_eq!(finishes.len(), 1);
    let elapsed = finishes[0].0 - started;
    assert!(elapsed >= secs(7.0), "finished after {:?}", elapsed);
    assert!(elapsed <= secs(7.0) + engine.tick_interval(), "finished after {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn repeated_pauses_add_up() {
    let (engine, recorder) = engine();
    let started = Instant::now();
    engine.start(secs(4.0)).unwrap();

    sleep(secs(0.5)).await;
    engine.pause().unwrap();
    sleep(secs(1.25)).await;
    engine.resume().unwrap();

    sleep(secs(1.0)).await;
    engine.pause().unwrap();
    sleep(secs(2.5)).await;
    engine.resume().unwrap();

    sleep(secs(10.0)).await;
    let finishes = recorder.finishes();
    assert_eq!(finishes.len(), 1);
    let elapsed = finishes[0].0 - started;
    let expected = secs(4.0 + 1.25 + 2.5);
    assert!(elapsed >= expected && elapsed <= expected + engine.tick_interval());
}

#[tokio::test(start_paused = true)]
async fn finish_early_reports_early_from_running() {
    let (engine, recorder) = engine();
    engine.start(secs(25.0 * 60.0)).unwrap();
    sleep(secs(3.0)).await;
    engine.finish_early().unwrap();
    engine.wait_stopped().await.unwrap();

    sleep(secs(30.0 * 60.0)).await;
    let finishes: Vec<bool> = recorder.finishes().into_iter().map(|(_, early)| early).collect();
    assert_eq!(finishes, vec![true]);
    assert_eq!(engine.state(), TimerState::FinishedEarly);
}

#[tokio::test(start_paused = true)]
async fn finish_early_reports_early_from_paused() {
    let (engine, recorder) = engine();
    engine.start(secs(2.0)).unwrap();
    sleep(secs(1.0)).await;
    engine.pause().unwrap();
    sleep(secs(10.0)).await;
    engine.finish_early().unwrap();
    engine.wait_stopped().await.unwrap();

    let finishes: Vec<bool> = recorder.finishes().into_iter().map(|(_, early)| early).collect();
    assert_eq!(finishes, vec![true]);
}

#[tokio::test(start_paused = true)]
async fn force_quit_stops_within_one_tick() {
    let (engine, recorder) = engine();
    engine.start(secs(10.0)).unwrap();
    sleep(secs(0.5)).await;

    engine.force_quit();
    timeout(engine.tick_interval(), engine.wait_stopped())
        .await
        .expect("tick task still running after one interval")
        .unwrap();
    assert!(engine.is_stopped());
    assert_eq!(engine.state(), TimerState::Cancelled);

    let seen = recorder.events().len();
    sleep(secs(20.0)).await;
    assert!(recorder.finishes().is_empty());
    assert_eq!(recorder.events().len(), seen);
}

#[tokio::test(start_paused = true)]
async fn force_quit_while_paused() {
    let (engine, recorder) = engine();
    engine.start(secs(10.0)).unwrap();
    sleep(secs(1.0)).await;
    engine.pause().unwrap();

    engine.shutdown().await.unwrap();
    assert_eq!(engine.state(), TimerState::Cancelled);
    assert!(engine.resume().is_err());

    sleep(secs(20.0)).await;
    assert!(recorder.finishes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn force_quit_after_finish_is_noop() {
    let (engine, recorder) = engine();
    engine.start(secs(1.0)).unwrap();
    sleep(secs(1.5)).await;
    assert_eq!(engine.state(), TimerState::FinishedFull);

    engine.force_quit();
    engine.force_quit();
    engine.wait_stopped().await.unwrap();
    assert_eq!(engine.state(), TimerState::FinishedFull);
    assert_eq!(recorder.finishes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_commands_leave_idle_engine_untouched() {
    let (engine, recorder) = engine();
    assert_eq!(engine.pause().unwrap_err().state, TimerState::Idle);
    assert!(engine.resume().is_err());
    assert!(engine.finish_early().is_err());
    assert_eq!(engine.state(), TimerState::Idle);
    assert!(engine.is_stopped());

    sleep(secs(1.0)).await;
    assert!(recorder.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn resume_while_running_is_rejected() {
    let (engine, recorder) = engine();
    engine.start(secs(2.0)).unwrap();
    sleep(secs(0.5)).await;
    assert!(engine.resume().is_err());
    assert_eq!(engine.state(), TimerState::Running);

    sleep(secs(2.0)).await;
    assert_eq!(recorder.finishes().len(), 1);
}
