//! Call submission form pane.

use crate::nav::Pane;
use crate::state::{App, FormField};
use crate::views::helpers::pane_block;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LABEL_WIDTH: usize = 15;

pub const SUBMITTING: &str = "Creating call...";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let form = &app.form;
    let focused = app.focus == Pane::Form;
    let block = pane_block(Pane::Form.title(), focused, theme);
    let inner = block.inner(area);

    let mut lines: Vec<Line> = FormField::all()
        .iter()
        .map(|field| {
            let active = focused && form.focus == *field;
            let label_style = if active {
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_dim)
            };
            let value_style = if active && form.editing {
                Style::default().fg(theme.text).bg(theme.bg_highlight)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                    label_style,
                ),
                Span::styled(form.input(*field).value().to_string(), value_style),
            ])
        })
        .collect();

    lines.push(Line::default());
    if form.submitting {
        lines.push(Line::from(Span::styled(
            SUBMITTING,
            Style::default().fg(theme.info),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    } else if let Some(call_id) = &form.last_created {
        lines.push(Line::from(Span::styled(
            format!("Created call {}", call_id),
            Style::default().fg(theme.success),
        )));
    } else {
        let hint = if form.editing {
            "Enter submit | Tab next field | Esc stop editing"
        } else {
            "Enter or n to edit"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.text_dim),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && form.editing {
        let row = FormField::all()
            .iter()
            .position(|field| *field == form.focus)
            .unwrap_or(0) as u16;
        let column = (LABEL_WIDTH + form.input(form.focus).cursor()) as u16;
        if row < inner.height && column < inner.width {
            f.set_cursor(inner.x + column, inner.y + row);
        }
    }
}
