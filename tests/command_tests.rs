use chrono::{Local, NaiveDate, NaiveTime};
use fitox::commands::*;
use fitox::errors::{FitoxError, InputError, StoreError};
use fitox::models::{Category, Priority, Role};
use fitox::responder::{Responder, MOTIVATION_PREFIX};
use fitox::storage::Store;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;

fn with_test_ctx<F>(f: F)
where
    F: FnOnce(&Context, &TempDir),
{
    let dir = TempDir::new().unwrap();
    let ctx = Context {
        store: Store::open(dir.path().join("data")).unwrap(),
        responder: Responder::default(),
    };
    f(&ctx, &dir);
}

fn fields(title: &str) -> TaskFields {
    TaskFields {
        title: Some(title.into()),
        ..TaskFields::default()
    }
}

#[test]
fn test_add_uses_defaults() {
    with_test_ctx(|ctx, _| {
        let task = cmd_add(ctx, fields("Morning meditation"), true).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.user_id, "guest");
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, Local::now().date_naive());
        assert_eq!(task.time_slot, None);
        assert!(!task.completed);

        let tasks = ctx.tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Morning meditation");
    });
}

#[test]
fn test_add_with_all_fields() {
    with_test_ctx(|ctx, _| {
        let task = cmd_add(
            ctx,
            TaskFields {
                title: Some("  Gym  ".into()),
                category: Some("health".into()),
                priority: Some("HIGH".into()),
                due: Some("2026-01-05".into()),
                time: Some("07:30".into()),
            },
            true,
        )
        .unwrap();
        assert_eq!(task.title, "Gym");
        assert_eq!(task.category, Category::Health);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(task.time_slot, NaiveTime::from_hms_opt(7, 30, 0));
    });
}

#[test]
fn test_add_rejects_bad_input() {
    with_test_ctx(|ctx, _| {
        let err = cmd_add(ctx, fields("   "), true).unwrap_err();
        assert!(matches!(err, FitoxError::Input(InputError::EmptyTitle)));

        let mut bad_date = fields("Read");
        bad_date.due = Some("05/01/2026".into());
        assert!(matches!(
            cmd_add(ctx, bad_date, true),
            Err(FitoxError::Input(InputError::InvalidDate(_)))
        ));

        let mut bad_category = fields("Read");
        bad_category.category = Some("Chores".into());
        assert!(matches!(
            cmd_add(ctx, bad_category, true),
            Err(FitoxError::Input(InputError::UnknownCategory(_)))
        ));

        assert!(ctx.tasks().unwrap().is_empty());
    });
}

#[test]
fn test_toggle_flips_status() {
    with_test_ctx(|ctx, _| {
        let id = cmd_add(ctx, fields("Task to complete"), true).unwrap().id;

        assert!(cmd_toggle(ctx, id, true).unwrap().completed);
        assert!(ctx.tasks().unwrap()[0].completed);

        assert!(!cmd_toggle(ctx, id, true).unwrap().completed);
        assert!(!ctx.tasks().unwrap()[0].completed);
    });
}

#[test]
fn test_edit_and_clear_time_slot() {
    with_test_ctx(|ctx, _| {
        let mut f = fields("Study");
        f.time = Some("09:00".into());
        let id = cmd_add(ctx, f, true).unwrap().id;

        let edited = cmd_edit(
            ctx,
            id,
            TaskFields {
                title: Some("Study Rust".into()),
                category: Some("Study".into()),
                time: Some(String::new()),
                ..TaskFields::default()
            },
            true,
        )
        .unwrap();
        assert_eq!(edited.title, "Study Rust");
        assert_eq!(edited.category, Category::Study);
        assert_eq!(edited.time_slot, None);
        assert_eq!(edited.priority, Priority::Medium);
    });
}

#[test]
fn test_remove_and_missing_ids() {
    with_test_ctx(|ctx, _| {
        let id = cmd_add(ctx, fields("Temp"), true).unwrap().id;
        cmd_remove(ctx, id, true).unwrap();
        assert!(ctx.tasks().unwrap().is_empty());

        assert!(matches!(
            cmd_remove(ctx, id, true),
            Err(FitoxError::Store(StoreError::TaskNotFound { id: 1 }))
        ));
        assert!(matches!(
            cmd_toggle(ctx, 42, true),
            Err(FitoxError::Store(StoreError::TaskNotFound { .. }))
        ));
    });
}

#[test]
fn test_ids_are_unique_after_delete() {
    with_test_ctx(|ctx, _| {
        let a = cmd_add(ctx, fields("A"), true).unwrap().id;
        let b = cmd_add(ctx, fields("B"), true).unwrap().id;
        cmd_remove(ctx, a, true).unwrap();
        let c = cmd_add(ctx, fields("C"), true).unwrap().id;
        assert_ne!(b, c);
    });
}

#[test]
fn test_tasks_are_scoped_by_owner() {
    with_test_ctx(|ctx, _| {
        let guest_id = cmd_add(ctx, fields("Guest task"), true).unwrap().id;

        let user = cmd_login(ctx, "Ada Lovelace".into(), "Ada@Example.com".into(), None, true).unwrap();
        assert_eq!(user.id, "ada@example.com");
        assert!(ctx.tasks().unwrap().is_empty());
        assert!(cmd_toggle(ctx, guest_id, true).is_err());

        cmd_add(ctx, fields("Ada task"), true).unwrap();
        assert_eq!(ctx.tasks().unwrap().len(), 1);

        // logging in again keeps the original join date
        let again = cmd_login(ctx, "Ada L".into(), "ada@example.com".into(), None, true).unwrap();
        assert_eq!(again.created_at, user.created_at);

        ctx.store.clear_user().unwrap();
        let guest_tasks = ctx.tasks().unwrap();
        assert_eq!(guest_tasks.len(), 1);
        assert_eq!(guest_tasks[0].title, "Guest task");
    });
}

#[test]
fn test_login_rejects_blank_fields() {
    with_test_ctx(|ctx, _| {
        assert!(matches!(
            cmd_login(ctx, "   ".into(), "  ".into(), None, true),
            Err(FitoxError::Input(InputError::EmptyField("name")))
        ));
        assert!(matches!(
            cmd_login(ctx, "Sam".into(), " ".into(), None, true),
            Err(FitoxError::Input(InputError::EmptyField("email")))
        ));

        assert!(!ctx.store.dir().join("user.json").exists());
        assert_eq!(ctx.owner().unwrap(), "guest");
    });
}

#[test]
fn test_chat_persists_transcript() {
    with_test_ctx(|ctx, _| {
        let mut rng = StdRng::seed_from_u64(3);
        let reply = cmd_chat(ctx, "I need some motivation", &mut rng, true)
            .unwrap()
            .unwrap();
        assert!(reply.starts_with(MOTIVATION_PREFIX));

        assert_eq!(cmd_chat(ctx, "   ", &mut rng, true).unwrap(), None);

        cmd_chat(ctx, "hello", &mut rng, true).unwrap();
        let history = ctx.store.load_chat().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[2].content, "hello");

        cmd_history(ctx, true).unwrap();
        assert!(ctx.store.load_chat().unwrap().is_empty());
    });
}

#[test]
fn test_import_camel_case_export() {
    with_test_ctx(|ctx, dir| {
        cmd_add(ctx, fields("Existing"), true).unwrap();

        let export = dir.path().join("fitox_tasks.json");
        fs::write(
            &export,
            r#"[
                {"id":"a1b2","userId":"someone","title":"Run","category":"health",
                 "priority":"high","dueDate":"2026-01-05","timeSlot":"06:45",
                 "status":true,"createdAt":"2026-01-01T08:00:00.000Z"},
                {"id":"c3d4","userId":"someone","title":"Read","category":"Study",
                 "priority":"Low","dueDate":"2026-01-06","status":false,
                 "createdAt":"2026-01-01T08:00:00.000Z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(cmd_import(ctx, &export, true).unwrap(), 2);

        let tasks = ctx.tasks().unwrap();
        assert_eq!(tasks.len(), 3);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(tasks.iter().all(|t| t.user_id == "guest"));
        assert_eq!(tasks[1].category, Category::Health);
        assert!(tasks[1].completed);
        assert_eq!(tasks[2].time_slot, None);

        let raw = fs::read_to_string(ctx.store.dir().join("tasks.json")).unwrap();
        assert!(raw.contains("\"category\": \"Health\""));
        assert!(raw.contains("\"due_date\": \"2026-01-05\""));
    });
}

#[test]
fn test_corrupt_store_is_an_error() {
    with_test_ctx(|ctx, _| {
        fs::write(ctx.store.dir().join("tasks.json"), "{not json").unwrap();
        assert!(matches!(
            ctx.tasks(),
            Err(FitoxError::Store(StoreError::Parse { .. }))
        ));
        // nothing was overwritten
        assert!(cmd_add(ctx, fields("New"), true).is_err());
        let raw = fs::read_to_string(ctx.store.dir().join("tasks.json")).unwrap();
        assert_eq!(raw, "{not json");
    });
}

#[test]
fn test_reset_removes_everything() {
    with_test_ctx(|ctx, _| {
        cmd_add(ctx, fields("Task"), true).unwrap();
        cmd_login(ctx, "Sam".into(), "sam@example.com".into(), None, true).unwrap();
        cmd_chat(ctx, "thanks", &mut StdRng::seed_from_u64(1), true).unwrap();

        cmd_reset(ctx, true).unwrap();

        assert!(ctx.store.load_all_tasks().unwrap().is_empty());
        assert!(ctx.store.load_chat().unwrap().is_empty());
        assert_eq!(ctx.store.load_user().unwrap(), None);
    });
}
