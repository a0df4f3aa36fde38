//! View rendering dispatch.

pub mod call;
pub mod calls;
pub mod form;
pub mod helpers;
pub mod media;
pub mod overview;
pub mod performance;
pub mod raw;
pub mod transcript;

use crate::nav::Pane;
use crate::notifications::NotificationLevel;
use crate::state::App;
use crate::views::helpers::centered_rect;
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP_LINES: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "Move between panes"),
    ("n", "New call (edit the form)"),
    ("Enter", "Edit form / open selected call"),
    ("Esc", "Stop editing / stop watching call"),
    ("j / k", "Move selection or scroll"),
    ("h / l, 1-5", "Switch call tab"),
    ("r", "Refresh call list"),
    ("?", "Toggle this help"),
    ("q / Ctrl-C", "Quit"),
];

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(body[0]);

    form::render(f, app, left[0]);
    calls::render(f, app, left[1]);
    call::render(f, app, body[1]);

    render_footer(f, app, layout[2]);

    if app.show_help {
        render_help(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("CALLSCOPE | API: {}", app.config.api_base_url);
    let attached = match app.viewer.call_id() {
        Some(call_id) => format!("Viewing {}", call_id),
        None => "No call attached".to_string(),
    };
    let header = Paragraph::new(Span::styled(attached, Style::default().fg(app.theme.text_dim)))
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            title,
            Style::default().fg(app.theme.primary),
        )));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.focus {
        Pane::Form if app.form.editing => "Enter submit • Tab next field • Esc stop editing",
        _ => "Tab switch pane • n new call • Enter open • j/k move • 1-5 tabs • r refresh • ? help • q quit",
    };
    let (text, style) = if let Some(note) = app.notifications.last() {
        let color = match note.level {
            NotificationLevel::Info => app.theme.info,
            NotificationLevel::Warning => app.theme.warning,
            NotificationLevel::Error => app.theme.error,
            NotificationLevel::Success => app.theme.success,
        };
        (
            format!(
                "[{}] {}: {}",
                note.created_at.with_timezone(&Local).format("%H:%M:%S"),
                note.level.label(),
                note.message
            ),
            Style::default().fg(color),
        )
    } else {
        (help.to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 60, f.size());
    let key_style = Style::default()
        .fg(app.theme.primary)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), key_style),
                Span::styled(*description, text_style),
            ])
        })
        .collect();
    let help = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help (any key to close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
