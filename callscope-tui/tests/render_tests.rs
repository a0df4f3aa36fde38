use callscope_core::BackendError;
use callscope_test_utils::{fixtures, ScriptedBackend};
use callscope_tui::config::{ThemeConfig, TuiConfig};
use callscope_tui::events::TuiEvent;
use callscope_tui::nav::ViewerTab;
use callscope_tui::state::App;
use callscope_tui::views::render_view;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use tokio::sync::mpsc;

fn app() -> App {
    let config = TuiConfig {
        api_base_url: "http://localhost:8000".to_string(),
        request_timeout_ms: 5_000,
        poll_interval_ms: 3_000,
        log_path: "tmp/callscope-tui.log".into(),
        log_filter: "callscope_tui=info".to_string(),
        theme: ThemeConfig {
            name: "dark".to_string(),
        },
    };
    let (tx, _rx) = mpsc::channel(8);
    App::new(config, Arc::new(ScriptedBackend::new()), tx)
}

/// Show `payload` in the viewer as if the poller had fetched it.
fn show(app: &mut App, payload: serde_json::Value) {
    let call_id = payload["call_id"].as_str().unwrap().to_string();
    let generation = app.viewer.attach(&call_id);
    app.viewer
        .apply_fetch(generation, &call_id, Ok(fixtures::snapshot(payload)))
        .unwrap();
}

fn screen(app: &App) -> String {
    screen_sized(app, 140, 50)
}

fn screen_sized(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn empty_app_shows_placeholders() {
    let mut app = app();
    app.calls.replace(Vec::new());
    let out = screen(&app);
    assert!(out.contains("CALLSCOPE"));
    assert!(out.contains("New Call"));
    assert!(out.contains("Phone Number"));
    assert!(out.contains("No calls found."));
    assert!(out.contains("No call selected."));
}

#[test]
fn form_error_is_rendered() {
    let mut app = app();
    app.submit_form();
    let out = screen(&app);
    assert!(out.contains("Please enter a phone number"));
}

#[test]
fn call_list_rows() {
    let mut app = app();
    app.calls.replace(vec![
        fixtures::summary("call_0000aaaa1111", "ended"),
        fixtures::summary("call_0000bbbb2222", "ongoing"),
    ]);
    let out = screen(&app);
    assert!(out.contains("Calls (2)"));
    assert!(out.contains("aaaa1111"));
    assert!(out.contains("To: +14155550123"));
}

#[test]
fn in_progress_call_shows_polling_indicator() {
    let mut app = app();
    show(&mut app, fixtures::ongoing_call("call_live"));
    let out = screen(&app);
    assert!(out.contains("Call in progress..."));
    assert!(out.contains("Checking for updates every 3 seconds..."));
    assert!(out.contains("Call Information"));
    assert!(out.contains("Support Agent"));
}

#[test]
fn ended_call_waits_for_analysis() {
    let mut app = app();
    show(&mut app, fixtures::ended_call("call_done"));
    let out = screen(&app);
    assert!(out.contains("Call ended, generating analysis..."));
    assert!(out.contains("Analysis typically takes 30-60 seconds"));
}

#[test]
fn fetch_error_visible_while_waiting_for_analysis() {
    let mut app = app();
    show(&mut app, fixtures::ended_call("call_x"));
    app.handle_event(TuiEvent::CallFetched {
        generation: app.viewer.generation,
        call_id: "call_x".to_string(),
        result: Err(BackendError::Rejected {
            status: 502,
            detail: "upstream down".to_string(),
        }),
    });

    let out = screen_sized(&app, 100, 40);
    assert!(out.contains("Call ended, generating analysis..."));
    assert!(out.contains("Error: upstream down"));
    assert!(out.contains("Checking for updates every 3 seconds..."));
    assert!(out.contains("completion"));
    assert!(out.contains("WARN: Call call_x: upstream down"));
}

#[test]
fn stopped_call_shows_paused_note() {
    let mut app = app();
    show(&mut app, fixtures::ongoing_call("call_live"));
    app.viewer.stop_polling();
    let out = screen(&app);
    assert!(out.contains("Updates paused."));
    assert!(!out.contains("Checking for updates"));
}

#[test]
fn completed_call_tabs() {
    let mut app = app();
    show(&mut app, fixtures::completed_call("call_done"));

    let overview = screen(&app);
    assert!(overview.contains("Call completed with analysis"));
    assert!(!overview.contains("Checking for updates"));
    assert!(overview.contains("AI Analysis"));
    assert!(overview.contains("Cost Analysis"));

    app.viewer.set_tab(ViewerTab::Transcript);
    let transcript = screen(&app);
    assert!(transcript.contains("Structured Transcript"));
    assert!(transcript.contains("lookup_booking"));

    app.viewer.set_tab(ViewerTab::Performance);
    let performance = screen(&app);
    assert!(performance.contains("Latency Metrics (ms)"));
    assert!(performance.contains("E2E"));
    assert!(performance.contains("812ms"));

    app.viewer.set_tab(ViewerTab::Media);
    let media = screen(&app);
    assert!(media.contains("Call Recording"));
    assert!(media.contains("Public Logs"));

    app.viewer.set_tab(ViewerTab::Raw);
    let raw = screen(&app);
    assert!(raw.contains("Raw Call Data"));
    assert!(raw.contains("\"agent_name\": \"Support Agent\""));
}

#[test]
fn help_overlay() {
    let mut app = app();
    app.show_help = true;
    let out = screen(&app);
    assert!(out.contains("Help (any key to close)"));
    assert!(out.contains("Refresh call list"));
}
