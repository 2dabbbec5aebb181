use chrono::NaiveDate;

use dayweaver::calendar::{day_index, items_for_day, marked_days, DayItem};
use dayweaver::models::{ImportantDate, Priority, Task, TaskDetails};

fn task_due(name: &str, due: &str) -> Task {
    Task::new(
        name,
        TaskDetails {
            due_date: Some(due.into()),
            ..TaskDetails::default()
        },
    )
}

fn task_with_priority(name: &str, due: &str, priority: Priority) -> Task {
    Task::new(
        name,
        TaskDetails {
            due_date: Some(due.into()),
            priority: Some(priority),
            ..TaskDetails::default()
        },
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_unparseable_due_date_is_excluded_from_groupings() {
    let tasks = vec![
        task_due("good", "2025-12-01T09:00:00Z"),
        task_due("bad", "next tuesday-ish"),
        Task::new("undated", TaskDetails::default()),
    ];
    let index = day_index(&tasks, &[]);

    assert_eq!(index.len(), 1);
    let items = &index[&day(2025, 12, 1)];
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), tasks[0].id);

    // The excluded tasks are only missing from the index, not removed
    // from the underlying collection.
    assert_eq!(tasks.len(), 3);
}

#[test]
fn test_same_day_tasks_keep_insertion_order() {
    let tasks = vec![
        task_due("first", "2025-12-01"),
        task_due("second", "2025-12-01"),
    ];
    let items = items_for_day(&tasks, &[], day(2025, 12, 1));

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id(), tasks[0].id);
    assert_eq!(items[1].id(), tasks[1].id);
}

#[test]
fn test_items_for_day_sorted_by_timestamp() {
    let tasks = vec![
        task_due("afternoon", "2025-12-01T15:00:00Z"),
        task_due("morning", "2025-12-01T08:00:00Z"),
    ];
    let dates = vec![ImportantDate::new("2025-12-01T12:00:00Z", "lunch date")];
    let items = items_for_day(&tasks, &dates, day(2025, 12, 1));

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id(), tasks[1].id);
    assert_eq!(items[1].id(), dates[0].id);
    assert_eq!(items[2].id(), tasks[0].id);
}

#[test]
fn test_equal_timestamps_put_tasks_before_important_dates() {
    let tasks = vec![task_due("task", "2025-12-01T09:00:00Z")];
    let dates = vec![ImportantDate::new("2025-12-01T09:00:00Z", "marker")];
    let items = items_for_day(&tasks, &dates, day(2025, 12, 1));

    assert!(matches!(items[0], DayItem::Task(_)));
    assert!(matches!(items[1], DayItem::ImportantDate(_)));
}

#[test]
fn test_day_index_groups_both_collections() {
    let tasks = vec![
        task_due("a", "2025-12-01"),
        task_due("b", "2025-12-02"),
    ];
    let dates = vec![ImportantDate::new("2025-12-01T00:00:00Z", "marker")];
    let index = day_index(&tasks, &dates);

    assert_eq!(index[&day(2025, 12, 1)].len(), 2);
    assert_eq!(index[&day(2025, 12, 2)].len(), 1);
}

#[test]
fn test_marked_days_per_tier_and_important() {
    let tasks = vec![
        task_with_priority("h", "2025-12-01", Priority::High),
        task_with_priority("m", "2025-12-02", Priority::Medium),
        task_with_priority("l", "2025-12-03", Priority::Low),
        // No priority: never marked
        task_due("plain", "2025-12-04"),
        // No parseable date: never marked
        task_with_priority("lost", "soon", Priority::High),
    ];
    let dates = vec![ImportantDate::new("2025-12-05T00:00:00Z", "marker")];
    let marks = marked_days(&tasks, &dates);

    assert!(marks.high.contains(&day(2025, 12, 1)));
    assert!(marks.medium.contains(&day(2025, 12, 2)));
    assert!(marks.low.contains(&day(2025, 12, 3)));
    assert_eq!(marks.high.len(), 1);
    assert!(marks.important.contains(&day(2025, 12, 5)));
    assert_eq!(marks.important.len(), 1);

    assert_eq!(marks.top_priority(day(2025, 12, 1)), Some(Priority::High));
    assert_eq!(marks.top_priority(day(2025, 12, 5)), None);
}

#[test]
fn test_marked_days_tiers_overlap_on_same_day() {
    let tasks = vec![
        task_with_priority("h", "2025-12-01", Priority::High),
        task_with_priority("l", "2025-12-01", Priority::Low),
    ];
    let marks = marked_days(&tasks, &[]);

    assert!(marks.high.contains(&day(2025, 12, 1)));
    assert!(marks.low.contains(&day(2025, 12, 1)));
    assert_eq!(marks.top_priority(day(2025, 12, 1)), Some(Priority::High));
}
