use std::fs;

use fitox::commands::Context;
use fitox::errors::{FitoxError, StoreError};
use fitox::models::{Category, Priority};
use fitox::responder::Responder;
use fitox::storage::Store;
use fitox::tui::app::{App, InputMode};
use fitox::tui::run_tui;
use tempfile::TempDir;

fn test_ctx(dir: &TempDir) -> Context {
    Context {
        store: Store::open(dir.path()).unwrap(),
        responder: Responder::default(),
    }
}

fn enter(app: &mut App, text: &str) {
    app.input_buffer = text.to_string();
    app.handle_input();
}

#[test]
fn test_corrupt_chat_fails_startup() {
    let dir = TempDir::new().unwrap();
    let ctx = test_ctx(&dir);
    fs::write(dir.path().join("chat.json"), "{bad").unwrap();

    assert!(matches!(
        run_tui(ctx),
        Err(FitoxError::Store(StoreError::Parse { .. }))
    ));
}

#[test]
fn test_corrupt_profile_fails_startup() {
    let dir = TempDir::new().unwrap();
    let ctx = test_ctx(&dir);
    fs::write(dir.path().join("user.json"), "[]").unwrap();

    assert!(matches!(
        App::new(ctx),
        Err(FitoxError::Store(StoreError::Parse { .. }))
    ));
}

#[test]
fn test_add_wizard_stays_on_bad_step() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(test_ctx(&dir)).unwrap();

    app.start_add();
    enter(&mut app, "Evening walk");
    enter(&mut app, "chores");
    assert_eq!(app.add_state.step, 1);
    assert_eq!(app.input_buffer, "chores");
    assert!(app.status.is_some());

    enter(&mut app, "health");
    enter(&mut app, "");
    enter(&mut app, "2026-13-40");
    assert_eq!(app.add_state.step, 3);
    assert_eq!(app.input_buffer, "2026-13-40");

    enter(&mut app, "2026-01-05");
    enter(&mut app, "25:99");
    assert_eq!(app.add_state.step, 4);
    assert!(app.input_mode == InputMode::Adding);

    enter(&mut app, "18:30");
    assert!(app.input_mode == InputMode::Normal);
    assert_eq!(app.status, None);
    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.summary().total, 1);
    let task = &app.tasks[0];
    assert_eq!(task.title, "Evening walk");
    assert_eq!(task.category, Category::Health);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.due_date.to_string(), "2026-01-05");
    assert_eq!(task.time_slot.unwrap().to_string(), "18:30:00");
}
