use std::env;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use dayweaver::ai::types::ScheduleTaskEntry;
use dayweaver::manager::{filter_tasks, DateBook, TaskManager};
use dayweaver::models::{Priority, SubTask, TaskDetails, TaskStatus};
use dayweaver::storage::TASKS_FILE;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_dir<F>(f: F)
where
    F: FnOnce(&Path),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let dir = TempDir::new().unwrap();
    env::set_var("DAYWEAVER_DATA_DIR", dir.path());

    f(dir.path());

    env::remove_var("DAYWEAVER_DATA_DIR");
}

#[test]
fn test_add_defaults_and_prepends() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        let first = manager.add("First", TaskDetails::default());
        let second = manager.add("Second", TaskDetails::default());

        assert_ne!(first, second);
        assert_eq!(manager.tasks().len(), 2);
        // Newest first
        assert_eq!(manager.tasks()[0].name, "Second");
        assert_eq!(manager.tasks()[0].status, TaskStatus::Todo);
    });
}

#[test]
fn test_mutations_are_persisted_immediately() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        let id = manager.add("Persisted", TaskDetails::default());
        manager.set_status(&id, TaskStatus::InProgress);

        // A fresh manager sees the saved state.
        let reopened = TaskManager::open();
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].status, TaskStatus::InProgress);
    });
}

#[test]
fn test_add_then_remove_restores_pre_add_state() {
    with_test_dir(|dir| {
        let mut manager = TaskManager::open();
        manager.add("Existing", TaskDetails::default());

        let before_tasks = manager.tasks().to_vec();
        let before_file: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(TASKS_FILE)).unwrap()).unwrap();

        let id = manager.add("Ephemeral", TaskDetails::default());
        manager.remove(&id);

        assert_eq!(manager.tasks(), before_tasks.as_slice());
        let after_file: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(TASKS_FILE)).unwrap()).unwrap();
        assert_eq!(after_file, before_file);
    });
}

#[test]
fn test_update_replaces_by_id() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        let id = manager.add("Before", TaskDetails::default());

        let mut updated = manager.get(&id).unwrap().clone();
        updated.name = "After".into();
        updated.details.priority = Some(Priority::Medium);
        manager.update(updated);

        let task = manager.get(&id).unwrap();
        assert_eq!(task.name, "After");
        assert_eq!(task.details.priority, Some(Priority::Medium));
    });
}

#[test]
fn test_unknown_id_mutations_are_noops() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        manager.add("Only", TaskDetails::default());
        let before = manager.tasks().to_vec();

        manager.set_status("missing-id", TaskStatus::Done);
        manager.remove("missing-id");
        manager.set_subtask_status("missing-id", "sub", TaskStatus::Done);

        assert_eq!(manager.tasks(), before.as_slice());
    });
}

#[test]
fn test_filter_matches_name_and_description() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        manager.add("Write REPORT", TaskDetails::default());
        manager.add(
            "Other",
            TaskDetails {
                description: Some("the quarterly report draft".into()),
                ..TaskDetails::default()
            },
        );
        manager.add("Unrelated", TaskDetails::default());

        let hits = manager.filter("report", None, None);
        assert_eq!(hits.len(), 2);
    });
}

#[test]
fn test_filter_by_status_and_priority() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        let a = manager.add(
            "A",
            TaskDetails {
                priority: Some(Priority::High),
                ..TaskDetails::default()
            },
        );
        manager.add(
            "B",
            TaskDetails {
                priority: Some(Priority::Low),
                ..TaskDetails::default()
            },
        );
        manager.set_status(&a, TaskStatus::Done);

        let done = manager.filter("", Some(TaskStatus::Done), None);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].name, "A");

        let high_done = manager.filter("", Some(TaskStatus::Done), Some(Priority::High));
        assert_eq!(high_done.len(), 1);

        let low_done = manager.filter("", Some(TaskStatus::Done), Some(Priority::Low));
        assert!(low_done.is_empty());
    });
}

#[test]
fn test_filter_is_idempotent() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        manager.add(
            "Read paper",
            TaskDetails {
                priority: Some(Priority::High),
                ..TaskDetails::default()
            },
        );
        manager.add("read book", TaskDetails::default());
        manager.add("Cook dinner", TaskDetails::default());

        let once = manager.filter("read", None, Some(Priority::High));
        let twice = filter_tasks(&once, "read", None, Some(Priority::High));
        assert_eq!(once, twice);
    });
}

#[test]
fn test_filter_does_not_mutate_state() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        manager.add("Stay put", TaskDetails::default());
        let before = manager.tasks().to_vec();

        let _ = manager.filter("nothing matches this", Some(TaskStatus::Blocked), None);
        assert_eq!(manager.tasks(), before.as_slice());
    });
}

#[test]
fn test_subtask_status_is_persisted_on_parent() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        let id = manager.add(
            "Parent",
            TaskDetails {
                sub_tasks: Some(vec![SubTask {
                    id: "sub-1".into(),
                    name: "step one".into(),
                    estimated_time: "1hr".into(),
                    status: TaskStatus::Todo,
                }]),
                ..TaskDetails::default()
            },
        );

        manager.set_subtask_status(&id, "sub-1", TaskStatus::Done);

        let reopened = TaskManager::open();
        let subs = reopened.get(&id).unwrap().details.sub_tasks.clone().unwrap();
        assert_eq!(subs[0].status, TaskStatus::Done);
    });
}

#[test]
fn test_absorb_schedule_merges_without_dedup() {
    with_test_dir(|_dir| {
        let mut manager = TaskManager::open();
        manager.add("Pre-existing", TaskDetails::default());

        let entries = vec![
            ScheduleTaskEntry {
                name: "Morning review".into(),
                description: Some("Go over yesterday's notes".into()),
                category: Some("Study".into()),
            },
            ScheduleTaskEntry {
                name: "Morning review".into(),
                description: Some("Go over yesterday's notes".into()),
                category: Some("Study".into()),
            },
        ];
        let ids = manager.absorb_schedule(entries);

        // Identical entries still become two distinct tasks.
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(manager.tasks().len(), 3);
        assert_eq!(manager.tasks()[0].status, TaskStatus::Todo);
        assert_eq!(
            manager.tasks()[0].details.category.as_deref(),
            Some("Study")
        );

        let reopened = TaskManager::open();
        assert_eq!(reopened.tasks().len(), 3);
    });
}

#[test]
fn test_date_book_add_and_remove() {
    with_test_dir(|_dir| {
        let mut book = DateBook::open();
        let id = book.add("2025-12-24T00:00:00Z", "Holiday prep");
        assert_eq!(book.dates().len(), 1);
        assert!(book.dates()[0].id.starts_with("imp-"));

        book.remove(&id);
        assert!(book.dates().is_empty());

        let reopened = DateBook::open();
        assert!(reopened.dates().is_empty());
    });
}
