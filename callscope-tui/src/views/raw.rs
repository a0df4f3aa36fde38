//! Raw tab: the last payload exactly as received, pretty-printed.

use crate::theme::Theme;
use callscope_core::CallSnapshot;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub fn lines(snapshot: &CallSnapshot, theme: &Theme) -> Vec<Line<'static>> {
    let body = Style::default().fg(theme.text);
    let mut lines = vec![
        Line::from(Span::styled(
            "Raw Call Data",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(
        snapshot
            .raw_pretty()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), body))),
    );
    lines
}
