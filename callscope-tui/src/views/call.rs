//! Call viewer pane: status header, tab strip and the active tab.

use crate::nav::{Pane, ViewerTab};
use crate::state::App;
use crate::theme::call_status_color;
use crate::views::helpers::{detail_style, pane_block};
use crate::views::{media, overview, performance, raw, transcript};
use crate::widgets::{DetailPanel, DetailSection, StatusIndicator};
use callscope_core::{CallPoll, PollPhase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Wrap},
    Frame,
};

pub const NO_CALL_SELECTED: &str =
    "No call selected. Create a call or pick one from the list (Enter).";

pub const UPDATES_PAUSED: &str = "Updates paused. Open the call from the list to resume.";

const TABS_HEIGHT: u16 = 3;

/// "Checking for updates every N seconds..." for the configured interval.
pub fn polling_indicator(interval_ms: u64) -> String {
    let seconds = if interval_ms % 1000 == 0 {
        (interval_ms / 1000).to_string()
    } else {
        format!("{:.1}", interval_ms as f64 / 1000.0)
    };
    format!("Checking for updates every {} seconds...", seconds)
}

fn status_indicator(app: &App, poll: &CallPoll) -> StatusIndicator {
    let theme = &app.theme;
    let style = match (poll.phase(), poll.record()) {
        (PollPhase::Error, _) => Style::default().fg(theme.error),
        (_, Some(record)) => Style::default().fg(call_status_color(&record.call_status)),
        _ => Style::default().fg(theme.info),
    };

    let mut details = Vec::new();
    if poll.is_polling() {
        details.push(polling_indicator(app.config.poll_interval_ms));
    }
    if let Some(hint) = poll.pending_hint() {
        details.push(hint.to_string());
    }
    if !poll.is_polling() && poll.phase() != PollPhase::DisplayingFinal {
        details.push(UPDATES_PAUSED.to_string());
    }

    StatusIndicator {
        title: format!("Call {}", poll.call_id()),
        status: poll.status_line(),
        style,
        details,
        detail_style: Style::default().fg(theme.text_dim),
        error: poll.error().map(str::to_string),
        error_style: Style::default().fg(theme.error),
    }
}

fn render_placeholder(f: &mut Frame<'_>, app: &App, area: Rect, text: &str) {
    let focused = app.focus == Pane::Call;
    let paragraph = Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.text_dim),
    ))
    .wrap(Wrap { trim: true })
    .block(pane_block(Pane::Call.title(), focused, &app.theme));
    f.render_widget(paragraph, area);
}

fn render_tabs(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<Line> = ViewerTab::all()
        .iter()
        .map(|tab| Line::from(format!("{} {}", tab.index() + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.viewer.tab.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(pane_block("", app.focus == Pane::Call, &app.theme));
    f.render_widget(tabs, area);
}

fn render_lines(f: &mut Frame<'_>, app: &App, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.viewer.scroll, 0))
        .block(pane_block(title, app.focus == Pane::Call, &app.theme));
    f.render_widget(paragraph, area);
}

fn render_tab_body(f: &mut Frame<'_>, app: &App, poll: &CallPoll, area: Rect) {
    let Some(snapshot) = poll.snapshot() else {
        let text = if poll.phase() == PollPhase::Error {
            "Unable to load call details. Retrying..."
        } else {
            "Loading call details..."
        };
        render_placeholder(f, app, area, text);
        return;
    };
    let record = &snapshot.record;
    let theme = &app.theme;
    let title = app.viewer.tab.title();

    let sections = match app.viewer.tab {
        ViewerTab::Overview => overview::sections(record, theme),
        ViewerTab::Performance => {
            let sections = performance::sections(record);
            if sections.is_empty() {
                render_placeholder(f, app, area, performance::NO_METRICS);
                return;
            }
            sections
        }
        ViewerTab::Media => {
            let sections = media::sections(record);
            if sections.is_empty() {
                render_placeholder(f, app, area, media::NO_MEDIA);
                return;
            }
            let mut all = vec![DetailSection::default().with_note(media::MEDIA_NOTE)];
            all.extend(sections);
            all
        }
        ViewerTab::Transcript => {
            render_lines(f, app, area, title, transcript::lines(record, theme));
            return;
        }
        ViewerTab::Raw => {
            render_lines(f, app, area, title, raw::lines(snapshot, theme));
            return;
        }
    };

    let panel = DetailPanel {
        title,
        sections,
        style: detail_style(theme),
        scroll: app.viewer.scroll,
    };
    panel.render(f, area);
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(poll) = app.viewer.poll.as_ref() else {
        render_placeholder(f, app, area, NO_CALL_SELECTED);
        return;
    };

    let indicator = status_indicator(app, poll);
    let status_height = indicator
        .height(area.width)
        .min(area.height.saturating_sub(TABS_HEIGHT))
        .max(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(status_height),
            Constraint::Length(TABS_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    indicator.render(f, chunks[0]);
    render_tabs(f, app, chunks[1]);
    render_tab_body(f, app, poll, chunks[2]);
}
