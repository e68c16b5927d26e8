use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{App, FormField, Mode, TaskForm};
use crate::model::Priority;
use crate::project::DueStatus;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_search(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_hints(frame, chunks[2]);

    match app.mode {
        Mode::Form => {
            if let Some(form) = &app.form {
                render_form(frame, form);
            }
        }
        Mode::Confirm => render_confirm(frame, app),
        Mode::Message => render_message(frame, app),
        Mode::Help => render_help(frame),
        Mode::Normal | Mode::Search => {}
    }
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.search.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(search, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.rows.is_empty() {
        let empty = Paragraph::new("No tasks found.")
            .block(Block::default().borders(Borders::ALL).title(" Tasks "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let text_style = if row.done {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().bold()
            };
            let deadline_style = match row.due {
                DueStatus::Overdue => Style::default().fg(Color::Red),
                DueStatus::DueToday => Style::default().fg(Color::Yellow),
                DueStatus::Normal => Style::default().fg(Color::DarkGray),
            };
            let priority_style = match row.priority {
                Priority::High => Style::default().fg(Color::Red),
                Priority::Medium => Style::default().fg(Color::Yellow),
                Priority::Low => Style::default().fg(Color::Green),
            };

            let deadline = row.deadline.clone().unwrap_or_else(|| "-".to_string());
            let line = Line::from(vec![
                Span::raw(if row.done { "[x] " } else { "[ ] " }),
                Span::styled(row.text.clone(), text_style),
                Span::raw("  "),
                Span::styled(deadline, deadline_style),
                Span::raw("  "),
                Span::styled(row.priority.to_string(), priority_style),
                Span::raw("  "),
                Span::styled(row.category.to_string(), Style::default().fg(Color::Cyan)),
            ]);

            let item = ListItem::new(line);
            if i == app.cursor {
                item.style(Style::default().bg(Color::DarkGray))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Tasks "));
    frame.render_widget(list, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new("a add  e edit  space toggle  d delete  / search  ? help  q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, area);
}

fn render_form(frame: &mut Frame, form: &TaskForm) {
    let title = if form.editing.is_some() {
        " Edit Task "
    } else {
        " Add Task "
    };
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Green)),
        area,
    );

    let inner = area.inner(Margin::new(2, 1));
    let field_line = |label: &str, value: String, field: FormField| {
        let style = if form.focused == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{label:10}"), style),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        field_line("Text", form.text.clone(), FormField::Text),
        field_line("Deadline", form.deadline.clone(), FormField::Deadline),
        field_line(
            "Priority",
            format!("< {} >", form.priority),
            FormField::Priority,
        ),
        field_line(
            "Category",
            format!("< {} >", form.category),
            FormField::Category,
        ),
        Line::raw(""),
        Line::styled(
            "tab next field  \u{2190}/\u{2192} change  enter save  esc cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(err) = &form.error {
        lines.push(Line::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        ));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, inner);
}

fn render_confirm(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let text = app
        .pending_delete
        .as_ref()
        .map(|(_, t)| t.clone())
        .unwrap_or_default();
    let body = Paragraph::new(vec![
        Line::raw("Delete this task?"),
        Line::styled(format!("\"{text}\""), Style::default().fg(Color::DarkGray)),
        Line::raw(""),
        Line::styled("y yes    n no", Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn render_message(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let text = app.message.clone().unwrap_or_default();
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Nudge ")
                .style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let body = Paragraph::new(vec![
        Line::raw("j/k or arrows  move"),
        Line::raw("a              add task"),
        Line::raw("e              edit task"),
        Line::raw("space/enter    toggle done"),
        Line::raw("d              delete task (with confirmation)"),
        Line::raw("/              search"),
        Line::raw("r              refresh"),
        Line::raw("q              quit"),
        Line::raw(""),
        Line::raw("Overdue deadlines show red, due today yellow."),
        Line::raw("Reminders pop up near a deadline while the TUI runs."),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(body, area);
}

/// Centered popup rectangle taking the given percentages of the frame.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
