use std::io::{self, Write};

use chrono::{Datelike, Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::ai::types::{
    AnalyzeTimeUsageInput, BreakdownInput, BurnoutInput, CreateScheduleInput, EfficiencyInput,
    MeetingPrepInput, ReallocationInput, ReallocationTask, RiskLevel, TaskSummary,
};
use crate::ai::Planner;
use crate::calendar::{items_for_day, marked_days, DayItem};
use crate::manager::{DateBook, TaskManager};
use crate::models::{next_task_id, parse_day, Priority, SubTask, TaskDetails, TaskStatus};
use crate::storage::delete_database;

fn parse_status_arg(s: &str, silent: bool) -> Option<TaskStatus> {
    let parsed = TaskStatus::parse(s);
    if parsed.is_none() && !silent {
        eprintln!("Invalid status '{}'. Use todo, inprogress, done or blocked.", s);
    }
    parsed
}

fn parse_priority_arg(s: &str, silent: bool) -> Option<Priority> {
    let parsed = Priority::parse(s);
    if parsed.is_none() && !silent {
        eprintln!("Invalid priority '{}'. Use low, medium or high.", s);
    }
    parsed
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
        TaskStatus::Blocked => Color::Red,
    }
}

fn priority_cell(priority: Option<Priority>) -> Cell {
    match priority {
        Some(Priority::High) => Cell::new("High").fg(Color::Red),
        Some(Priority::Medium) => Cell::new("Medium").fg(Color::Yellow),
        Some(Priority::Low) => Cell::new("Low").fg(Color::Green),
        None => Cell::new("-"),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn today_string() -> String {
    today().format("%Y-%m-%d").to_string()
}

fn task_summaries(manager: &TaskManager) -> Vec<TaskSummary> {
    manager.tasks().iter().map(TaskSummary::from_task).collect()
}

fn planner_or_warn(silent: bool) -> Option<Planner> {
    match Planner::from_env() {
        Ok(planner) => Some(planner),
        Err(err) => {
            if !silent {
                eprintln!("AI service not configured: {}", err);
            }
            None
        }
    }
}

/// Adds a new task.
pub fn cmd_add(
    name: String,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    silent: bool,
) {
    if name.trim().is_empty() {
        if !silent {
            eprintln!("Task name is required.");
        }
        return;
    }
    if let Some(d) = &due {
        if parse_day(d).is_none() {
            if !silent {
                eprintln!("Invalid due date '{}'. Use YYYY-MM-DD.", d);
            }
            return;
        }
    }
    let priority = match priority {
        Some(p) => match parse_priority_arg(&p, silent) {
            Some(parsed) => Some(parsed),
            None => return,
        },
        None => None,
    };

    let mut manager = TaskManager::open();
    let id = manager.add(
        name.trim(),
        TaskDetails {
            description,
            due_date: due,
            priority,
            category,
            ..TaskDetails::default()
        },
    );
    if !silent {
        println!("Task added (id = {})", id);
    }
}

/// Lists tasks in a formatted table, optionally filtered.
pub fn cmd_list(search: String, status: Option<String>, priority: Option<String>) {
    let status = status
        .filter(|s| s != "all")
        .and_then(|s| parse_status_arg(&s, false));
    let priority = priority
        .filter(|p| p != "all")
        .and_then(|p| parse_priority_arg(&p, false));

    let manager = TaskManager::open();
    let tasks = manager.filter(&search, status, priority);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Subs").add_attribute(Attribute::Bold),
        ]);

    let now = today();
    for t in tasks {
        let due_str = t.details.due_date.clone().unwrap_or_else(|| "-".into());
        let overdue = t.is_overdue(now);
        let sub_count = t
            .details
            .sub_tasks
            .as_ref()
            .map_or(0, |subs| subs.len());
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(&t.name),
            Cell::new(due_str).fg(if overdue { Color::Red } else { Color::Reset }),
            priority_cell(t.details.priority),
            Cell::new(t.status.label()).fg(status_color(t.status)),
            Cell::new(t.details.category.clone().unwrap_or_default()),
            Cell::new(if sub_count > 0 {
                sub_count.to_string()
            } else {
                String::new()
            }),
        ]);
    }

    println!("{table}");
}

/// Changes a task's status.
pub fn cmd_status(id: String, status: String, silent: bool) {
    let Some(status) = parse_status_arg(&status, silent) else {
        return;
    };
    let mut manager = TaskManager::open();
    if manager.get(&id).is_none() {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    }
    manager.set_status(&id, status);
    if !silent {
        println!("Task {} is now {}.", id, status.label());
    }
}

/// Edits an existing task's details.
pub fn cmd_edit(
    id: String,
    name: Option<String>,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    silent: bool,
) {
    let mut manager = TaskManager::open();
    let Some(task) = manager.get(&id).cloned() else {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    };

    let mut updated = task;
    if let Some(n) = name {
        updated.name = n;
    }
    if let Some(d) = description {
        updated.details.description = Some(d);
    }
    if let Some(d) = due {
        if parse_day(&d).is_none() {
            if !silent {
                eprintln!("Invalid due date '{}'. Use YYYY-MM-DD.", d);
            }
            return;
        }
        updated.details.due_date = Some(d);
    }
    if let Some(p) = priority {
        match parse_priority_arg(&p, silent) {
            Some(parsed) => updated.details.priority = Some(parsed),
            None => return,
        }
    }
    if let Some(c) = category {
        updated.details.category = Some(c);
    }
    manager.update(updated);
    if !silent {
        println!("Task {} updated.", id);
    }
}

/// Removes a task by id.
pub fn cmd_remove(id: String, silent: bool) {
    let mut manager = TaskManager::open();
    if manager.get(&id).is_none() {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    }
    manager.remove(&id);
    if !silent {
        println!("Task {} removed.", id);
    }
}

/// Sets the status of a sub-task, persisting the parent task.
pub fn cmd_subtask(task_id: String, subtask_id: String, status: String, silent: bool) {
    let Some(status) = parse_status_arg(&status, silent) else {
        return;
    };
    let mut manager = TaskManager::open();
    let known = manager.get(&task_id).is_some_and(|t| {
        t.details
            .sub_tasks
            .as_ref()
            .is_some_and(|subs| subs.iter().any(|st| st.id == subtask_id))
    });
    if !known {
        if !silent {
            eprintln!("Sub-task {} of task {} not found.", subtask_id, task_id);
        }
        return;
    }
    manager.set_subtask_status(&task_id, &subtask_id, status);
    if !silent {
        println!("Sub-task {} is now {}.", subtask_id, status.label());
    }
}

/// Adds an important date.
pub fn cmd_date_add(date: String, description: String, silent: bool) {
    if parse_day(&date).is_none() {
        if !silent {
            eprintln!("Invalid date '{}'. Use YYYY-MM-DD.", date);
        }
        return;
    }
    if description.trim().is_empty() {
        if !silent {
            eprintln!("A description is required.");
        }
        return;
    }
    let mut book = DateBook::open();
    let id = book.add(date, description.trim());
    if !silent {
        println!("Important date added (id = {})", id);
    }
}

/// Lists all important dates.
pub fn cmd_date_list() {
    let book = DateBook::open();
    if book.dates().is_empty() {
        println!("No important dates found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Date", "Description"]);
    for d in book.dates() {
        table.add_row(vec![d.id.clone(), d.date.clone(), d.description.clone()]);
    }
    println!("{table}");
}

/// Removes an important date by id.
pub fn cmd_date_remove(id: String, silent: bool) {
    let mut book = DateBook::open();
    let len_before = book.dates().len();
    book.remove(&id);
    if book.dates().len() == len_before {
        if !silent {
            eprintln!("Important date {} not found.", id);
        }
    } else if !silent {
        println!("Important date {} removed.", id);
    }
}

/// Prints the agenda for one day: tasks and important dates interleaved,
/// ordered by timestamp.
pub fn cmd_day(date: Option<String>) {
    let day = match date {
        Some(d) => match parse_day(&d) {
            Some(day) => day,
            None => {
                eprintln!("Invalid date '{}'. Use YYYY-MM-DD.", d);
                return;
            }
        },
        None => today(),
    };

    let manager = TaskManager::open();
    let book = DateBook::open();
    let items = items_for_day(manager.tasks(), book.dates(), day);
    if items.is_empty() {
        println!("Nothing scheduled for {}.", day);
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);
    for item in items {
        let time = item
            .instant()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".into());
        match item {
            DayItem::Task(t) => {
                table.add_row(vec![
                    Cell::new(time),
                    Cell::new("Task"),
                    Cell::new(&t.name),
                    Cell::new(t.status.label()).fg(status_color(t.status)),
                ]);
            }
            DayItem::ImportantDate(d) => {
                table.add_row(vec![
                    Cell::new(time),
                    Cell::new("Important").fg(Color::Magenta),
                    Cell::new(&d.description),
                    Cell::new(""),
                ]);
            }
        }
    }
    println!("Agenda for {}", day);
    println!("{table}");
}

/// Prints a month grid with priority and important-date markers.
pub fn cmd_month(date: Option<String>) {
    let anchor = match date {
        Some(d) => match parse_day(&d) {
            Some(day) => day,
            None => {
                eprintln!("Invalid date '{}'. Use YYYY-MM-DD.", d);
                return;
            }
        },
        None => today(),
    };

    let manager = TaskManager::open();
    let book = DateBook::open();
    let marks = marked_days(manager.tasks(), book.dates());

    let (year, month) = (anchor.year(), anchor.month());
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };
    let next_month_start = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let days_in_month = match next_month_start.and_then(|d| d.pred_opt()) {
        Some(last) => last.day(),
        None => return,
    };
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut cells: Vec<Cell> = vec![Cell::new(""); lead];
    for day_num in 1..=days_in_month {
        let Some(day) = NaiveDate::from_ymd_opt(year, month, day_num) else {
            continue;
        };
        let mut text = format!("{:>2}", day_num);
        if marks.important.contains(&day) {
            text.push('*');
        }
        let cell = match marks.top_priority(day) {
            Some(Priority::High) => Cell::new(format!("{}!", text)).fg(Color::Red),
            Some(Priority::Medium) => Cell::new(format!("{}+", text)).fg(Color::Yellow),
            Some(Priority::Low) => Cell::new(format!("{}.", text)).fg(Color::Green),
            None if marks.important.contains(&day) => Cell::new(text).fg(Color::Magenta),
            None => Cell::new(text),
        };
        cells.push(cell);
    }
    while cells.len() % 7 != 0 {
        cells.push(Cell::new(""));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    for week in cells.chunks(7) {
        table.add_row(week.to_vec());
    }
    println!("{}-{:02}", year, month);
    println!("{table}");
    println!("Markers: ! high  + medium  . low  * important date");
}

/// Creates a schedule from a natural-language description and merges the
/// extracted tasks into the task list.
pub async fn cmd_schedule(description: String, silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let input = CreateScheduleInput {
        schedule_description: description,
    };
    match planner.create_schedule(input).await {
        Ok(output) => {
            if !silent {
                println!("{}", output.schedule_text);
            }
            let entries = output.tasks.unwrap_or_default();
            if !entries.is_empty() {
                let mut manager = TaskManager::open();
                let ids = manager.absorb_schedule(entries);
                if !silent {
                    println!("\n{} task(s) added to your list.", ids.len());
                }
            }
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to create schedule: {}", err);
            }
        }
    }
}

/// Breaks a task description into sub-tasks; `--attach` stores them on an
/// existing task.
pub async fn cmd_breakdown(task: String, attach: Option<String>, silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let output = match planner.break_down_task(BreakdownInput { task }).await {
        Ok(output) => output,
        Err(err) => {
            if !silent {
                eprintln!("Failed to break down task: {}", err);
            }
            return;
        }
    };
    if output.sub_tasks.is_empty() {
        if !silent {
            println!("No sub-tasks suggested.");
        }
        return;
    }

    if !silent {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Sub-task", "Estimate"]);
        for st in &output.sub_tasks {
            table.add_row(vec![st.name.clone(), st.estimated_time.clone()]);
        }
        println!("{table}");
    }

    if let Some(task_id) = attach {
        let mut manager = TaskManager::open();
        let Some(parent) = manager.get(&task_id).cloned() else {
            if !silent {
                eprintln!("Task {} not found.", task_id);
            }
            return;
        };
        let mut updated = parent;
        updated.details.sub_tasks = Some(
            output
                .sub_tasks
                .into_iter()
                .map(|st| SubTask {
                    id: format!("sub-{}", next_task_id()),
                    name: st.name,
                    estimated_time: st.estimated_time,
                    status: TaskStatus::Todo,
                })
                .collect(),
        );
        let count = updated.details.sub_tasks.as_ref().map_or(0, |s| s.len());
        manager.update(updated);
        if !silent {
            println!("Attached {} sub-task(s) to task {}.", count, task_id);
        }
    }
}

/// Asks the service to reschedule the open, dated tasks for a given reason.
/// Results are displayed only; due dates are not changed.
pub async fn cmd_reallocate(reason: String, silent: bool) {
    let manager = TaskManager::open();
    let current_tasks: Vec<ReallocationTask> = manager
        .tasks()
        .iter()
        .filter(|t| t.status != TaskStatus::Done)
        .filter_map(|t| {
            t.due_day().map(|day| ReallocationTask {
                name: t.name.clone(),
                due_date: day.format("%Y-%m-%d").to_string(),
                duration: 1.0,
            })
        })
        .collect();
    if current_tasks.is_empty() {
        if !silent {
            println!("No scheduled tasks to reallocate.");
        }
        return;
    }

    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    match planner
        .reallocate_tasks(ReallocationInput {
            reason,
            current_tasks,
        })
        .await
    {
        Ok(output) => {
            if silent {
                return;
            }
            println!("{}", output.summary);
            if !output.rescheduled_tasks.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_header(vec!["Task", "New due date"]);
                for rt in output.rescheduled_tasks {
                    table.add_row(vec![rt.name, rt.new_due_date]);
                }
                println!("{table}");
            }
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to reallocate tasks: {}", err);
            }
        }
    }
}

/// Prints the weekly time-usage estimate.
pub async fn cmd_usage(silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let manager = TaskManager::open();
    let input = AnalyzeTimeUsageInput {
        tasks: task_summaries(&manager),
        current_date: today_string(),
    };
    match planner.analyze_time_usage(input).await {
        Ok(output) => {
            if silent {
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Day", "Study", "Work", "Personal", "Chill", "Sleep"]);
            for day in &output.weekly_usage {
                table.add_row(vec![
                    day.day.clone(),
                    format!("{:.1}", day.study),
                    format!("{:.1}", day.work),
                    format!("{:.1}", day.personal),
                    format!("{:.1}", day.chill),
                    format!("{:.1}", day.sleep),
                ]);
            }
            println!("{table}");
            if let Some(summary) = output.analysis_summary {
                println!("{}", summary);
            }
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to analyze time usage: {}", err);
            }
        }
    }
}

/// Prints the efficiency score for the current task list.
pub async fn cmd_efficiency(silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let manager = TaskManager::open();
    let input = EfficiencyInput {
        tasks: task_summaries(&manager),
        current_date: today_string(),
    };
    match planner.calculate_efficiency(input).await {
        Ok(output) => {
            if silent {
                return;
            }
            println!("Efficiency score: {:.0}/100", output.score);
            println!("{}", output.message);
            if let Some(feedback) = output.positive_feedback {
                println!("{}", feedback);
            }
            if let Some(suggestion) = output.improvement_suggestion {
                println!("Suggestion: {}", suggestion);
            }
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to calculate efficiency: {}", err);
            }
        }
    }
}

/// Prints the burnout risk assessment for the current task list.
pub async fn cmd_burnout(silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let manager = TaskManager::open();
    let input = BurnoutInput {
        tasks: task_summaries(&manager),
        current_date: today_string(),
    };
    match planner.predict_burnout(input).await {
        Ok(output) => {
            if silent {
                return;
            }
            let color_note = match output.risk_level {
                RiskLevel::Low => "low",
                RiskLevel::Medium => "medium",
                RiskLevel::High => "HIGH",
            };
            println!(
                "Burnout risk: {} ({:.0}/100)",
                color_note, output.progress_value
            );
            println!("{}", output.message);
            if let Some(factors) = output.contributing_factors {
                for factor in factors {
                    println!("- {}", factor);
                }
            }
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to predict burnout: {}", err);
            }
        }
    }
}

/// Adjusts the day around a calendar event: adjusted task list, reminders
/// and a speaker checklist.
pub async fn cmd_meeting_prep(event: String, silent: bool) {
    let Some(planner) = planner_or_warn(silent) else {
        return;
    };
    let manager = TaskManager::open();
    let current_tasks = manager
        .tasks()
        .iter()
        .filter(|t| t.status != TaskStatus::Done)
        .map(|t| match t.due_day() {
            Some(day) => format!("- {} (due {})", t.name, day),
            None => format!("- {}", t.name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let input = MeetingPrepInput {
        calendar_event: event,
        current_tasks,
    };
    match planner.prepare_for_meeting(input).await {
        Ok(output) => {
            if silent {
                return;
            }
            println!("Adjusted tasks:\n{}\n", output.adjusted_tasks);
            println!("Reminders:\n{}\n", output.reminders);
            println!("Speaker checklist:\n{}", output.speaker_checklist);
        }
        Err(err) => {
            if !silent {
                eprintln!("Failed to prepare for the meeting: {}", err);
            }
        }
    }
}

/// Resets the database by deleting all tasks and important dates.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks and important dates? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
