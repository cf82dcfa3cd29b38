use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::analytics::{category_breakdown, weekly_series};
use crate::commands::category_icon;
use crate::listing::SortDirection;
use crate::models::{Priority, Role};
use super::app::{App, InputField, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Tasks => draw_tasks(f, app, chunks[0]),
        ViewMode::Dashboard => draw_dashboard(f, app, chunks[0]),
        ViewMode::Coach => draw_coach(f, app, chunks[0]),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Add | Space: Done | d: Del | n: Title | t: Due | s: Time | g: Category | p: Priority | f/r: Filter | o/O: Sort | v: Dashboard",
            ViewMode::Dashboard => "q: Quit | v: Coach",
            ViewMode::Coach => "q: Quit | i: Type a message | v: Tasks",
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step (blank keeps the default) | Esc: Cancel",
        InputMode::Chatting => "Enter: Send | Esc: Cancel",
    };

    let help = match &app.status {
        Some(msg) => Paragraph::new(msg.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(help_text).style(Style::default().fg(Color::Gray)),
    }
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Title",
                1 => "Add Task: Category (Health/Study/Work/Personal)",
                2 => "Add Task: Priority (Low/Medium/High)",
                3 => "Add Task: Due Date (YYYY-MM-DD, blank = today)",
                _ => "Add Task: Time Slot (HH:MM, optional)",
            },
            InputMode::Editing => match app.input_field {
                InputField::Title => "Edit Title",
                InputField::Due => "Edit Due Date (YYYY-MM-DD)",
                InputField::Time => "Edit Time Slot (HH:MM, blank clears)",
                InputField::None => "Edit",
            },
            InputMode::Chatting => "Ask your coach anything...",
            InputMode::Normal => "",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn draw_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            let priority_color = match t.priority {
                Priority::High => Color::Red,
                Priority::Medium => Color::Yellow,
                Priority::Low => Color::Green,
            };

            Row::new(vec![
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(t.title.clone()),
                Cell::from(format!("{} {}", category_icon(t.category), t.category)),
                Cell::from(t.priority.as_str()).style(Style::default().fg(priority_color)),
                Cell::from(t.due_date.format("%b %-d").to_string()),
                Cell::from(t.time_slot.map(|s| s.format("%H:%M").to_string()).unwrap_or_default()),
                Cell::from(if t.completed { "Done" } else { "Pending" }),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(8),
    ];

    let arrow = match app.sort_direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    };
    let title = format!(
        "FITOX - Tasks | Category: {} | Priority: {} | Sort: {} {}",
        app.filter.category.map(|c| c.as_str()).unwrap_or("All"),
        app.filter.priority.map(|p| p.as_str()).unwrap_or("All"),
        app.sort_field.as_str(),
        arrow,
    );

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Task", "Category", "Priority", "Date", "Time", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let summary = app.summary();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Greeting + quote
            Constraint::Length(4), // Stat cards
            Constraint::Min(8),    // Chart + categories
        ])
        .split(area);

    let greeting = match &app.user {
        Some(u) => format!("Hey, {}!", u.first_name()),
        None => "Welcome to FITOX".to_string(),
    };
    let header = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(greeting, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("\"{}\"", app.quote),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(today.format("%A, %B %-d").to_string()));
    f.render_widget(header, chunks[0]);

    let cards = [
        ("Completed Today", summary.completed_today.to_string(), Color::Green),
        ("Pending", summary.pending_today.to_string(), Color::Yellow),
        ("Current Streak", format!("{} days", summary.streak), Color::Red),
        ("Total Done", summary.total_completed.to_string(), Color::Cyan),
        ("Completion", format!("{}%", summary.completion_rate), Color::Magenta),
    ];
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 5])
        .split(chunks[1]);
    for ((title, value, color), rect) in cards.iter().zip(card_areas.iter()) {
        let card = Paragraph::new(value.as_str())
            .style(Style::default().fg(*color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title(*title));
        f.render_widget(card, *rect);
    }

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[2]);

    let series = weekly_series(&app.tasks, today);
    let bars: Vec<(&str, u64)> = series
        .iter()
        .map(|d| (d.label.as_str(), d.completed as u64))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Daily Progress ({} done this week)",
            summary.week_completed
        )))
        .data(bars.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    f.render_widget(chart, lower[0]);

    let breakdown = category_breakdown(&app.tasks);
    let lines: Vec<Line> = if breakdown.is_empty() {
        vec![Line::from("No completed tasks yet.")]
    } else {
        breakdown
            .iter()
            .map(|c| Line::from(format!("{} {:<10} {}", category_icon(c.category), c.category, c.completed)))
            .collect()
    };
    let categories = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("By Category"));
    f.render_widget(categories, lower[1]);
}

fn draw_coach(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if app.chat.messages().is_empty() {
        lines.push(Line::from(Span::styled(
            "Hey there, champion!",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(
            "I'm your personal habit coach. Ask me for motivation, tips on building habits, or just chat about your goals!",
        ));
    }
    for m in app.chat.messages() {
        let (who, color) = match m.role {
            Role::User => ("You", Color::Cyan),
            Role::Assistant => ("Coach", Color::Green),
        };
        lines.push(Line::from(Span::styled(
            format!("{who}:"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for text in m.content.lines() {
            lines.push(Line::from(text.to_string()));
        }
        lines.push(Line::from(""));
    }

    // Keep the newest messages in view.
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let wrapped: usize = lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(inner_width))
        .sum();
    let scroll = wrapped.saturating_sub(inner_height) as u16;

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("FITOX Coach - AI-powered habit mentor"));
    f.render_widget(transcript, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
