use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{ImportantDate, Priority, Task};

/// A task or important date placed on a calendar day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayItem {
    Task(Task),
    ImportantDate(ImportantDate),
}

impl DayItem {
    pub fn id(&self) -> &str {
        match self {
            DayItem::Task(t) => &t.id,
            DayItem::ImportantDate(d) => &d.id,
        }
    }

    /// The item's full timestamp, used for intra-day ordering.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            DayItem::Task(t) => t.due_instant(),
            DayItem::ImportantDate(d) => d.instant(),
        }
    }
}

/// Groups both collections by the calendar-date portion of their timestamps.
///
/// Records without a parseable timestamp are skipped; they remain untouched
/// in the source collections. Within a day, tasks come before important
/// dates, each in collection order.
pub fn day_index(tasks: &[Task], dates: &[ImportantDate]) -> BTreeMap<NaiveDate, Vec<DayItem>> {
    let mut index: BTreeMap<NaiveDate, Vec<DayItem>> = BTreeMap::new();
    for task in tasks {
        if let Some(day) = task.due_day() {
            index.entry(day).or_default().push(DayItem::Task(task.clone()));
        }
    }
    for date in dates {
        if let Some(day) = date.day() {
            index
                .entry(day)
                .or_default()
                .push(DayItem::ImportantDate(date.clone()));
        }
    }
    index
}

/// The selected day's agenda: tasks and important dates interleaved,
/// ordered by timestamp ascending. Equal timestamps keep insertion order
/// (tasks before important dates).
pub fn items_for_day(tasks: &[Task], dates: &[ImportantDate], day: NaiveDate) -> Vec<DayItem> {
    let mut items: Vec<DayItem> = Vec::new();
    for task in tasks {
        if task.due_day() == Some(day) {
            items.push(DayItem::Task(task.clone()));
        }
    }
    for date in dates {
        if date.day() == Some(day) {
            items.push(DayItem::ImportantDate(date.clone()));
        }
    }
    // sort_by_key is stable, which is what keeps ties in insertion order
    items.sort_by_key(|item| item.instant());
    items
}

/// Day sets used to annotate the calendar grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayMarks {
    pub low: BTreeSet<NaiveDate>,
    pub medium: BTreeSet<NaiveDate>,
    pub high: BTreeSet<NaiveDate>,
    pub important: BTreeSet<NaiveDate>,
}

impl DayMarks {
    pub fn for_priority(&self, priority: Priority) -> &BTreeSet<NaiveDate> {
        match priority {
            Priority::Low => &self.low,
            Priority::Medium => &self.medium,
            Priority::High => &self.high,
        }
    }

    /// The highest priority tier marking `day`, if any.
    pub fn top_priority(&self, day: NaiveDate) -> Option<Priority> {
        if self.high.contains(&day) {
            Some(Priority::High)
        } else if self.medium.contains(&day) {
            Some(Priority::Medium)
        } else if self.low.contains(&day) {
            Some(Priority::Low)
        } else {
            None
        }
    }
}

/// Computes the marked-day sets: one per priority tier (from tasks carrying
/// both a priority and a parseable due date) and a separate set for
/// important dates.
pub fn marked_days(tasks: &[Task], dates: &[ImportantDate]) -> DayMarks {
    let mut marks = DayMarks::default();
    for task in tasks {
        let (Some(priority), Some(day)) = (task.details.priority, task.due_day()) else {
            continue;
        };
        match priority {
            Priority::Low => marks.low.insert(day),
            Priority::Medium => marks.medium.insert(day),
            Priority::High => marks.high.insert(day),
        };
    }
    for date in dates {
        if let Some(day) = date.day() {
            marks.important.insert(day);
        }
    }
    marks
}
