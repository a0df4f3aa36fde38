//! Status indicator widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
    /// Secondary lines under the status, e.g. the polling cadence.
    pub details: Vec<String>,
    pub detail_style: Style,
    pub error: Option<String>,
    pub error_style: Style,
}

impl StatusIndicator {
    /// Status first, then the error so it survives a short box, then details.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(self.status.clone(), self.style))];
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                self.error_style,
            )));
        }
        lines.extend(
            self.details
                .iter()
                .map(|detail| Line::from(Span::styled(detail.clone(), self.detail_style))),
        );
        lines
    }

    /// Rows needed to show every line at `width`, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let inner = usize::from(width.saturating_sub(2));
        let rows: usize = self
            .lines()
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                wrapped_rows(&text, inner)
            })
            .sum();
        u16::try_from(rows + 2).unwrap_or(u16::MAX)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.lines())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, area);
    }
}

/// Greedy word wrap row count; words longer than `width` are split.
fn wrapped_rows(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    let mut rows = 1;
    let mut col = 0;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        let needed = if col == 0 { len } else { col + 1 + len };
        if needed <= width {
            col = needed;
            continue;
        }
        if col > 0 {
            rows += 1;
        }
        rows += (len - 1) / width;
        col = (len - 1) % width + 1;
    }
    rows
}
