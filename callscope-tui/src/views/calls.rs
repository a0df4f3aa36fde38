//! Recent calls pane.

use crate::nav::Pane;
use crate::state::App;
use crate::theme::call_status_color;
use crate::views::helpers::pane_block;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const EMPTY_LIST: &str = "No calls found.";
pub const EMPTY_LIST_HINT: &str = "Make your first call using the form above (press n).";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = &app.calls;
    let focused = app.focus == Pane::Calls;
    let title = if state.loading {
        format!("{} (loading...)", Pane::Calls.title())
    } else {
        format!("{} ({})", Pane::Calls.title(), state.calls.len())
    };
    let block = pane_block(title, focused, theme);

    let (list_area, error_area) = if state.error.is_some() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    if state.is_empty_state() {
        let lines = vec![
            Line::from(Span::styled(EMPTY_LIST, Style::default().fg(theme.text))),
            Line::from(Span::styled(
                EMPTY_LIST_HINT,
                Style::default().fg(theme.text_dim),
            )),
        ];
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            list_area,
        );
    } else {
        let attached = app.viewer.call_id();
        let items: Vec<ListItem> = state
            .calls
            .iter()
            .map(|call| {
                let marker = if attached == Some(call.call_id.as_str()) {
                    "* "
                } else {
                    "  "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.primary)),
                    Span::styled(
                        call.row_label(),
                        Style::default().fg(call_status_color(&call.call_status)),
                    ),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(state.selected);
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, list_area, &mut list_state);
    }

    if let (Some(error), Some(area)) = (&state.error, error_area) {
        let paragraph = Paragraph::new(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(theme.error),
        ))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }
}
