use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputField, InputMode};
use crate::models::TaskStatus;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),    // Table
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(f.area());

    let today = Local::now().date_naive();

    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|t| {
            let due_str = t.details.due_date.clone().unwrap_or_default();
            let style = if t.status == TaskStatus::Done {
                Style::default().fg(Color::DarkGray)
            } else if t.status == TaskStatus::Blocked {
                Style::default().fg(Color::Red)
            } else if t.is_overdue(today) {
                Style::default().fg(Color::Red)
            } else if t.status == TaskStatus::InProgress {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };

            let sub_count = t.details.sub_tasks.as_ref().map_or(0, |s| s.len());
            Row::new(vec![
                Cell::from(t.name.clone()),
                Cell::from(due_str),
                Cell::from(
                    t.details
                        .priority
                        .map(|p| p.label().to_string())
                        .unwrap_or_default(),
                ),
                Cell::from(t.status.label()),
                Cell::from(t.details.category.clone().unwrap_or_default()),
                Cell::from(if sub_count > 0 {
                    sub_count.to_string()
                } else {
                    String::new()
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(5),
    ];

    let title = if app.search.is_empty() {
        "Day Weaver - Tasks".to_string()
    } else {
        format!("Day Weaver - Tasks (search: {})", app.search)
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Name", "Due", "Priority", "Status", "Category", "Subs"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => {
            "q: Quit | a: Add | Space: Cycle Status | d: Del | n: Name | t: Due | p: Priority | g: Category | /: Search | c: Toggle Done"
        }
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    match app.input_mode {
        InputMode::Editing | InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area); // Clear the area first

            let title = match app.input_mode {
                InputMode::Adding => match app.add_state.step {
                    0 => "Add Task: Enter Name",
                    1 => "Add Task: Enter Due Date (YYYY-MM-DD, Optional)",
                    2 => "Add Task: Enter Priority (low/medium/high, Optional)",
                    3 => "Add Task: Enter Category (Optional)",
                    _ => "Add Task",
                },
                InputMode::Editing => match app.input_field {
                    InputField::Name => "Edit Name",
                    InputField::Due => "Edit Due Date (YYYY-MM-DD)",
                    InputField::Priority => "Edit Priority (low/medium/high)",
                    InputField::Category => "Edit Category",
                    InputField::Search => "Search Tasks",
                    _ => "Edit",
                },
                _ => "",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height)) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
