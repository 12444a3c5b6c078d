//! Controller plus SQLite store, driven the way the terminal front end does.

use std::time::Duration;

use focus_timer::{
    cli::render::{collect_history, render_history},
    ControllerError, SessionController, SessionUpdate, SqliteTaskStore, TaskStore, TimerConfig,
    TimerState, ValidationError,
};

fn config() -> TimerConfig {
    TimerConfig::minutes(1).with_tick_interval(Duration::from_millis(250))
}

#[tokio::test(start_paused = true)]
async fn full_session_is_logged_as_complete() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteTaskStore::open(dir.path().join("pomodoro.db")).unwrap();
    let mut controller = SessionController::new(store, config());

    let started_at = controller.start_task("Outline chapter").unwrap().started_at;

    let mut ticks = Vec::new();
    let mut paused = false;
    let finished = loop {
        let event = controller.next_event().await.expect("session still active");
        match controller.handle_event(event).await.unwrap() {
            SessionUpdate::Tick(label) => {
                ticks.push(label);
                if ticks.len() == 8 && !paused {
                    controller.pause().unwrap();
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    assert_eq!(controller.snapshot().unwrap().state, TimerState::Paused);
                    controller.resume().unwrap();
                    paused = true;
                }
            }
            SessionUpdate::Finished { record, early } => break (record, early),
        }
    };

    let (record, early) = finished;
    assert!(!early);
    assert!(record.completed_full);
    assert_eq!(ticks.first().map(String::as_str), Some("01:00"));
    assert!(controller.active_record().is_none());

    let stored = controller.store().list_tasks_by_date(started_at.date_naive()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].started_at, started_at);
    assert!(stored[0].completed_full);

    let history = collect_history(controller.store(), None).unwrap();
    assert!(render_history(&history).contains("Outline chapter | full |"));
}

#[tokio::test(start_paused = true)]
async fn same_name_twice_in_a_day_is_refused() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let mut controller = SessionController::new(store, config());

    controller.start_task("Email").unwrap();
    controller.shutdown().await.unwrap();

    match controller.start_task("Email") {
        Err(ControllerError::Validation(ValidationError::DuplicateTask(name))) => {
            assert_eq!(name, "Email")
        }
        other => panic!("expected duplicate rejection, got {:?}", other.cloned()),
    }
    assert!(controller.start_task("Email follow-up").is_ok());
    controller.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn deleted_task_can_be_started_again() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let mut controller = SessionController::new(store, config());

    let started_at = controller.start_task("Refactor").unwrap().started_at;
    controller.shutdown().await.unwrap();

    controller.delete_task("Refactor", started_at).unwrap();
    assert!(controller.store().list_unique_dates().unwrap().is_empty());
    assert!(controller.start_task("Refactor").is_ok());
    controller.shutdown().await.unwrap();
}
