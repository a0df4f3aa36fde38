//! Detail panel widget for showing grouped field/value pairs.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone)]
pub struct DetailField {
    pub label: String,
    pub value: String,
    /// Overrides the panel's value style.
    pub style: Option<Style>,
}

impl DetailField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            style: None,
        }
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailSection {
    pub heading: Option<String>,
    /// Dimmed line under the heading.
    pub note: Option<String>,
    pub fields: Vec<DetailField>,
}

impl DetailSection {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn field(mut self, field: DetailField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: DetailField) {
        self.fields.push(field);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DetailStyle {
    pub heading: Style,
    pub note: Style,
    pub label: Style,
    pub value: Style,
}

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub sections: Vec<DetailSection>,
    pub style: DetailStyle,
    pub scroll: u16,
}

impl<'a> DetailPanel<'a> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if let Some(heading) = &section.heading {
                lines.push(Line::from(Span::styled(
                    heading.clone(),
                    self.style.heading.add_modifier(Modifier::BOLD),
                )));
            }
            if let Some(note) = &section.note {
                lines.push(Line::from(Span::styled(note.clone(), self.style.note)));
            }
            for field in &section.fields {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", field.label), self.style.label),
                    Span::styled(field.value.clone(), field.style.unwrap_or(self.style.value)),
                ]));
            }
        }
        lines
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));

        f.render_widget(widget, area);
    }
}
