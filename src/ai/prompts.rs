//! Prompt templates, one per operation. Each template states the expected
//! JSON output shape since the service only guarantees "some JSON object".

use crate::ai::types::{
    AnalyzeTimeUsageInput, BreakdownInput, BurnoutInput, CreateScheduleInput, EfficiencyInput,
    MeetingPrepInput, ReallocationInput, TaskSummary,
};

pub(crate) const SCHEDULER_ROLE: &str =
    "You are an AI-powered schedule assistant. You create smart, segmented schedules \
     with work and rest times and extract the key actionable tasks from them.";

pub(crate) const ANALYST_ROLE: &str =
    "You are an AI assistant that analyzes a user's task list against the current date.";

pub(crate) const PLANNER_ROLE: &str =
    "You are a personal assistant who specializes in planning and rescheduling work.";

fn tasks_json(tasks: &[TaskSummary]) -> String {
    serde_json::to_string_pretty(tasks).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn create_schedule(input: &CreateScheduleInput) -> String {
    format!(
        "User's desired schedule: {desc}\n\n\
         Generate the overall schedule, then extract the key actionable tasks from it.\n\
         Respond with a JSON object with fields:\n\
         - \"scheduleText\": the full, human-readable schedule\n\
         - \"tasks\": an array of {{\"name\", \"description\" (optional), \"category\" (optional)}}; \
         may be empty if no specific tasks are discernible",
        desc = input.schedule_description
    )
}

pub(crate) fn analyze_time_usage(input: &AnalyzeTimeUsageInput) -> String {
    format!(
        "Tasks:\n{tasks}\n\nCurrent date: {date}\n\n\
         Determine the Monday-to-Sunday week containing the current date and estimate hours \
         per day for the categories Study, Work and Personal from the tasks. For Chill and \
         Sleep use reasonable defaults and note the assumption in the summary.\n\
         Respond with a JSON object with fields:\n\
         - \"weeklyUsage\": exactly 7 objects in Mon..Sun order, each \
         {{\"day\", \"Study\", \"Work\", \"Personal\", \"Chill\", \"Sleep\"}} with hours as numbers\n\
         - \"analysisSummary\": optional string describing assumptions made",
        tasks = tasks_json(&input.tasks),
        date = input.current_date
    )
}

pub(crate) fn calculate_efficiency(input: &EfficiencyInput) -> String {
    format!(
        "Tasks:\n{tasks}\n\nCurrent date: {date}\n\n\
         Calculate an efficiency score from 0 to 100. Higher completion rate raises the \
         score; overdue tasks lower it (overdue high-priority tasks heavily); blocked tasks \
         lower it slightly.\n\
         Respond with a JSON object with fields:\n\
         - \"score\": number 0-100\n\
         - \"message\": qualitative summary\n\
         - \"positiveFeedback\": optional string\n\
         - \"improvementSuggestion\": optional string",
        tasks = tasks_json(&input.tasks),
        date = input.current_date
    )
}

pub(crate) fn predict_burnout(input: &BurnoutInput) -> String {
    format!(
        "Tasks:\n{tasks}\n\nCurrent date: {date}\n\n\
         Assess burnout risk from task load, overdue tasks, deadline density, high-priority \
         load and blocked tasks. Risk bands for the numeric value: low 10-39, medium 40-69, \
         high 70-99.\n\
         Respond with a JSON object with fields:\n\
         - \"riskLevel\": \"low\" | \"medium\" | \"high\"\n\
         - \"progressValue\": number 0-100 (higher means higher risk)\n\
         - \"message\": explanation and advice\n\
         - \"contributingFactors\": optional array of strings",
        tasks = tasks_json(&input.tasks),
        date = input.current_date
    )
}

pub(crate) fn break_down_task(input: &BreakdownInput) -> String {
    format!(
        "Task: {task}\n\n\
         Break the task down into smaller, manageable sub-tasks and estimate the time each \
         requires.\n\
         Respond with a JSON object with field:\n\
         - \"subTasks\": array of {{\"name\", \"estimatedTime\"}} where estimatedTime is a \
         short duration like \"1hr\" or \"30min\"",
        task = input.task
    )
}

pub(crate) fn reallocate_tasks(input: &ReallocationInput) -> String {
    let current = serde_json::to_string_pretty(&input.current_tasks)
        .unwrap_or_else(|_| "[]".to_string());
    format!(
        "The user is rescheduling tasks because of the following reason: {reason}\n\n\
         Current tasks:\n{current}\n\n\
         Reschedule the tasks considering the reason and balance the load across future \
         free slots. New due dates must be ISO format (YYYY-MM-DD). Be concise in the \
         summary.\n\
         Respond with a JSON object with fields:\n\
         - \"rescheduledTasks\": array of {{\"name\", \"newDueDate\"}}\n\
         - \"summary\": short summary of the changes made",
        reason = input.reason,
    )
}

pub(crate) fn prepare_for_meeting(input: &MeetingPrepInput) -> String {
    format!(
        "The user has a calendar event: {event}\n\
         The user currently has the following tasks scheduled: {tasks}\n\n\
         Adjust the task list to accommodate the event, compressing preparation tasks and \
         re-allocating time as needed. Also produce reminders and a speaker checklist for \
         the event.\n\
         Respond with a JSON object with string fields \"adjustedTasks\", \"reminders\" and \
         \"speakerChecklist\".",
        event = input.calendar_event,
        tasks = input.current_tasks
    )
}
