use smarttask_shared::{Storage, TaskStatus};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Level, Mode, TaskForm, FIELD_LABELS};

const HELP: &str =
    "a add  e edit  space toggle  d delete  s suggest subtasks  \u{2191}\u{2193} move  q quit";

pub fn draw<B: Backend, S: Storage>(f: &mut Frame<B>, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(4)].as_ref())
        .split(f.size());

    draw_tasks(f, app, chunks[0]);
    draw_status(f, app, chunks[1]);

    if let Mode::Form(form) = &app.mode {
        draw_form(f, form);
    }
}

fn draw_tasks<B: Backend, S: Storage>(f: &mut Frame<B>, app: &App<S>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Smart Task Manager");

    if app.tasks().is_empty() {
        let empty = Paragraph::new("No tasks yet! Press 'a' to add a new task.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .tasks()
        .iter()
        .map(|task| {
            let status_color = match task.status {
                TaskStatus::Pending => Color::Magenta,
                TaskStatus::Completed => Color::Green,
            };
            let mut lines = vec![
                Spans::from(vec![
                    Span::styled(
                        if task.title.is_empty() {
                            "No title"
                        } else {
                            task.title.as_str()
                        },
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(task.status.as_str(), Style::default().fg(status_color)),
                    Span::raw(format!("  due {}", task.due_date)),
                ]),
                Spans::from(Span::styled(
                    if task.description.is_empty() {
                        "No description"
                    } else {
                        task.description.as_str()
                    },
                    Style::default().fg(Color::LightBlue),
                )),
            ];
            lines.extend(
                task.subtasks
                    .iter()
                    .map(|s| Spans::from(Span::raw(format!("  - {s}")))),
            );
            if app.is_suggesting(task.id) {
                lines.push(Spans::from(Span::styled(
                    "  Suggesting...",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status<B: Backend, S: Storage>(f: &mut Frame<B>, app: &App<S>, area: Rect) {
    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.level {
            Level::Info => Color::Green,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        };
        lines.push(Spans::from(Span::styled(
            status.text.as_str(),
            Style::default().fg(color),
        )));
    }
    lines.push(Spans::from(Span::styled(
        HELP,
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_form<B: Backend>(f: &mut Frame<B>, form: &TaskForm) {
    let area = centered(f.size(), 60, 11);
    let title = if form.editing.is_some() {
        "Edit task (tab: next field, enter: save, esc: cancel)"
    } else {
        "Add task (tab: next field, enter: save, esc: cancel)"
    };

    let mut lines = Vec::new();
    for (i, label) in FIELD_LABELS.iter().enumerate() {
        let style = if i == form.focus {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Spans::from(Span::styled(*label, style)));
        let cursor = if i == form.focus { "_" } else { "" };
        lines.push(Spans::from(Span::raw(format!("  {}{}", form.fields[i], cursor))));
        lines.push(Spans::from(""));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
