//! Input/output schemas for each façade operation.
//!
//! Outputs are strict: unknown fields are rejected so nothing unvalidated
//! crosses the façade boundary. Field names mirror the service contract
//! (camelCase).

use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task, TaskStatus};

/// Trimmed task view sent to the service.
#[derive(Debug, Serialize, Clone)]
pub struct TaskSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TaskSummary {
    pub fn from_task(task: &Task) -> TaskSummary {
        TaskSummary {
            name: task.name.clone(),
            description: task.details.description.clone(),
            due_date: task.details.due_date.clone(),
            priority: task.details.priority,
            status: task.status,
            category: task.details.category.clone(),
        }
    }
}

// ── Schedule creation ──

#[derive(Debug, Serialize, Clone)]
pub struct CreateScheduleInput {
    /// Natural-language description of the desired schedule.
    #[serde(rename = "scheduleDescription")]
    pub schedule_description: String,
}

/// An actionable task extracted from a generated schedule.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScheduleTaskEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CreateScheduleOutput {
    #[serde(rename = "scheduleText")]
    pub schedule_text: String,
    #[serde(default)]
    pub tasks: Option<Vec<ScheduleTaskEntry>>,
}

// ── Time-usage analysis ──

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Serialize, Clone)]
pub struct AnalyzeTimeUsageInput {
    pub tasks: Vec<TaskSummary>,
    /// `YYYY-MM-DD`, anchors the Monday-to-Sunday week under analysis.
    #[serde(rename = "currentDate")]
    pub current_date: String,
}

/// Estimated hours per life category for one day.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DailyTimeUsage {
    pub day: String,
    #[serde(default, rename = "Study")]
    pub study: f64,
    #[serde(default, rename = "Work")]
    pub work: f64,
    #[serde(default, rename = "Personal")]
    pub personal: f64,
    #[serde(default, rename = "Chill")]
    pub chill: f64,
    #[serde(default, rename = "Sleep")]
    pub sleep: f64,
}

impl DailyTimeUsage {
    pub fn zeroed(day: &str) -> DailyTimeUsage {
        DailyTimeUsage {
            day: day.to_string(),
            study: 0.0,
            work: 0.0,
            personal: 0.0,
            chill: 0.0,
            sleep: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeTimeUsageOutput {
    /// Always normalized to exactly seven entries, Mon through Sun.
    #[serde(rename = "weeklyUsage")]
    pub weekly_usage: Vec<DailyTimeUsage>,
    #[serde(default, rename = "analysisSummary")]
    pub analysis_summary: Option<String>,
}

// ── Efficiency scoring ──

#[derive(Debug, Serialize, Clone)]
pub struct EfficiencyInput {
    pub tasks: Vec<TaskSummary>,
    #[serde(rename = "currentDate")]
    pub current_date: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EfficiencyOutput {
    /// 0 through 100.
    pub score: f64,
    pub message: String,
    #[serde(default, rename = "positiveFeedback")]
    pub positive_feedback: Option<String>,
    #[serde(default, rename = "improvementSuggestion")]
    pub improvement_suggestion: Option<String>,
}

// ── Burnout prediction ──

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct BurnoutInput {
    pub tasks: Vec<TaskSummary>,
    #[serde(rename = "currentDate")]
    pub current_date: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BurnoutOutput {
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    /// 0 through 100; higher means higher risk.
    #[serde(rename = "progressValue")]
    pub progress_value: f64,
    pub message: String,
    #[serde(default, rename = "contributingFactors")]
    pub contributing_factors: Option<Vec<String>>,
}

// ── Task breakdown ──

#[derive(Debug, Serialize, Clone)]
pub struct BreakdownInput {
    /// The task to break down, deadline included.
    pub task: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubTaskEstimate {
    pub name: String,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BreakdownOutput {
    #[serde(rename = "subTasks")]
    pub sub_tasks: Vec<SubTaskEstimate>,
}

// ── Dynamic reallocation ──

#[derive(Debug, Serialize, Clone)]
pub struct ReallocationTask {
    pub name: String,
    /// `YYYY-MM-DD`.
    #[serde(rename = "dueDate")]
    pub due_date: String,
    /// Estimated duration in hours.
    pub duration: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct ReallocationInput {
    /// Why the tasks need rescheduling, e.g. "I have a fever today".
    pub reason: String,
    #[serde(rename = "currentTasks")]
    pub current_tasks: Vec<ReallocationTask>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RescheduledTask {
    pub name: String,
    #[serde(rename = "newDueDate")]
    pub new_due_date: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReallocationOutput {
    #[serde(rename = "rescheduledTasks")]
    pub rescheduled_tasks: Vec<RescheduledTask>,
    pub summary: String,
}

// ── Meeting preparation ──

#[derive(Debug, Serialize, Clone)]
pub struct MeetingPrepInput {
    /// Event details including title and time.
    #[serde(rename = "calendarEvent")]
    pub calendar_event: String,
    /// Current tasks and their allocated times, as display text.
    #[serde(rename = "currentTasks")]
    pub current_tasks: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MeetingPrepOutput {
    #[serde(rename = "adjustedTasks")]
    pub adjusted_tasks: String,
    pub reminders: String,
    #[serde(rename = "speakerChecklist")]
    pub speaker_checklist: String,
}
