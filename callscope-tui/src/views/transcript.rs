//! Transcript tab.

use crate::theme::{role_color, Theme};
use callscope_core::{role_label, CallRecord, TranscriptEntry};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub const NO_TRANSCRIPT: &str = "No transcript available yet.";

pub fn lines(record: &CallRecord, theme: &Theme) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(theme.primary)
        .add_modifier(Modifier::BOLD);

    if let Some(entries) = record.structured_transcript() {
        let mut lines = vec![Line::from(Span::styled("Structured Transcript", heading))];
        for entry in entries {
            lines.push(Line::default());
            lines.extend(entry_lines(entry, theme));
        }
        return lines;
    }

    if let Some(text) = record.plain_transcript() {
        let mut lines = vec![
            Line::from(Span::styled("Basic Transcript", heading)),
            Line::default(),
        ];
        let body = Style::default().fg(theme.text);
        lines.extend(
            text.lines()
                .map(|line| Line::from(Span::styled(line.to_string(), body))),
        );
        return lines;
    }

    vec![Line::from(Span::styled(
        NO_TRANSCRIPT,
        Style::default().fg(theme.text_dim),
    ))]
}

fn entry_lines(entry: &TranscriptEntry, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.text_dim);
    let value = Style::default().fg(theme.text);
    let mut lines = vec![Line::from(Span::styled(
        role_label(&entry.role),
        Style::default()
            .fg(role_color(&entry.role, theme))
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) {
        lines.extend(
            content
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), value))),
        );
    }
    if let Some(tool) = &entry.tool_name {
        lines.push(Line::from(vec![
            Span::styled("Tool: ", label),
            Span::styled(tool.clone(), value),
        ]));
    }
    if let Some(arguments) = entry.arguments_text() {
        lines.push(Line::from(vec![
            Span::styled("Arguments: ", label),
            Span::styled(arguments, value),
        ]));
    }
    if let Some(result) = entry.result_text() {
        lines.push(Line::from(vec![
            Span::styled("Result: ", label),
            Span::styled(result, value),
        ]));
    }
    if let Some(time) = entry.time_sec {
        lines.push(Line::from(Span::styled(format!("Time: {:.1}s", time), label)));
    }
    if let Some((start, end)) = entry.word_span() {
        lines.push(Line::from(Span::styled(
            format!("Timing: {:.1}s - {:.1}s", start, end),
            label,
        )));
    }
    lines
}
