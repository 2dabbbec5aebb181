use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Discriminator tag stored on every important-date record.
pub const IMPORTANT_DATE_TAG: &str = "importantDate";

/// Lifecycle state shared by tasks and sub-tasks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    /// Parses the stored form (`todo`, `inprogress`, `done`, `blocked`).
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s.to_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "inprogress" | "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            "blocked" => Some(TaskStatus::Blocked),
            _ => None,
        }
    }

    /// The stored/wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Human-readable label for table output.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Blocked => "Blocked",
        }
    }

    /// The next status in the Todo -> In Progress -> Done -> Blocked cycle.
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Blocked,
            TaskStatus::Blocked => TaskStatus::Todo,
        }
    }
}

/// Task priority tier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// A sub-item of a task. Created and destroyed with the parent task;
/// it has no lifecycle of its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubTask {
    /// Unique within the parent task.
    pub id: String,
    pub name: String,
    /// Free-text duration estimate, e.g. "2hr" or "30min".
    #[serde(rename = "estimatedTime")]
    pub estimated_time: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// The optional attributes of a task, kept apart from the required core
/// so the invariants live on `id`/`name`/`status` alone.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TaskDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// RFC 3339 timestamp (or plain `YYYY-MM-DD`); drives calendar placement
    /// and overdue computation.
    #[serde(default, rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, rename = "subTasks", skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<SubTask>>,
    /// Free-text label, e.g. "Work", "Study", "Personal".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// A user-managed to-do item.
///
/// `id` is opaque, unique across the collection and immutable after
/// creation. Wire field names match the stored Day Weaver JSON (camelCase).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(flatten)]
    pub details: TaskDetails,
}

impl Task {
    /// Creates a task with a fresh time-based id and default `todo` status.
    pub fn new(name: impl Into<String>, details: TaskDetails) -> Task {
        Task {
            id: next_task_id(),
            name: name.into(),
            status: TaskStatus::Todo,
            details,
        }
    }

    /// The calendar day of the due date, `None` when absent or unparseable.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.details.due_date.as_deref().and_then(parse_day)
    }

    /// The full due timestamp, `None` when absent or unparseable.
    pub fn due_instant(&self) -> Option<DateTime<Utc>> {
        self.details.due_date.as_deref().and_then(parse_timestamp)
    }

    /// Whether the task is past due and not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_day().is_some_and(|d| d < today)
    }
}

/// A calendar-only marker, independent of tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImportantDate {
    pub id: String,
    /// RFC 3339 timestamp.
    pub date: String,
    pub description: String,
    /// Always [`IMPORTANT_DATE_TAG`].
    #[serde(rename = "type")]
    pub kind: String,
}

impl ImportantDate {
    pub fn new(date: impl Into<String>, description: impl Into<String>) -> ImportantDate {
        ImportantDate {
            id: format!("imp-{}", next_task_id()),
            date: date.into(),
            description: description.into(),
            kind: IMPORTANT_DATE_TAG.to_string(),
        }
    }

    /// The calendar day of the marker, `None` when unparseable.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

/// Parses a stored timestamp down to its calendar-date portion.
/// Accepts RFC 3339 or a plain `YYYY-MM-DD` date.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|dt| dt.date_naive())
}

/// Parses a stored timestamp. Plain dates count as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a time-based id: millisecond timestamp plus a process-local
/// counter so records created in the same millisecond stay distinct.
pub fn next_task_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", millis, n)
}
