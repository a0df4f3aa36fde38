use callscope_core::{CallStatus, TranscriptRole};
use callscope_tui::config::{ThemeConfig, TuiConfig};
use callscope_tui::keys::{map_edit_key, map_key, Action, EditAction};
use callscope_tui::nav::{Pane, ViewerTab};
use callscope_tui::theme::{call_status_color, role_color, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8000".to_string(),
        request_timeout_ms: 5_000,
        poll_interval_ms: 3_000,
        log_path: "tmp/callscope-tui.log".into(),
        log_filter: "callscope_tui=info".to_string(),
        theme: ThemeConfig {
            name: "dark".to_string(),
        },
    }
}

#[test]
fn config_requires_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "localhost:8000".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_known_theme() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "synthwave".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("callscope.toml");
    std::fs::write(
        &path,
        r#"
api_base_url = "http://127.0.0.1:9000"
request_timeout_ms = 2000
poll_interval_ms = 1500
log_path = "callscope.log"
log_filter = "callscope_tui=debug"

[theme]
name = "light"
"#,
    )
    .unwrap();

    let config = TuiConfig::from_path(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(config.poll_interval_ms, 1500);

    assert!(TuiConfig::from_path(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn env_override_replaces_base_url() {
    let mut config = base_config();
    config.apply_env_overrides(Some(" https://calls.example.com ".to_string()));
    assert_eq!(config.api_base_url, "https://calls.example.com");
    config.apply_env_overrides(Some("   ".to_string()));
    assert_eq!(config.api_base_url, "https://calls.example.com");
    config.validate().unwrap();
}

#[test]
fn tab_cycles_panes() {
    let event = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
    assert_eq!(map_key(event), Some(Action::NextPane));
    let mut pane = Pane::Form;
    for _ in 0..Pane::all().len() {
        pane = pane.next();
    }
    assert_eq!(pane, Pane::Form);
}

#[test]
fn ctrl_c_quits_in_both_modes() {
    let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(map_key(event), Some(Action::Quit));
    assert_eq!(map_edit_key(event), Some(EditAction::Quit));
}

#[test]
fn status_colors_are_palette_independent() {
    for status in [
        CallStatus::Created,
        CallStatus::Registered,
        CallStatus::Ongoing,
        CallStatus::Ended,
    ] {
        let color = call_status_color(&status);
        assert_ne!(color, call_status_color(&CallStatus::Other("x".to_string())));
    }
    let dark = Theme::dark();
    let light = Theme::light();
    assert_eq!(role_color(&TranscriptRole::Agent, &dark), dark.primary);
    assert_eq!(role_color(&TranscriptRole::Agent, &light), light.primary);
}

proptest! {
    #[test]
    fn keybinding_digit_switches_tab(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let event = KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };
        let action = map_key(event);
        match ch {
            '1'..='5' => {
                let index = (digit - 1) as usize;
                prop_assert_eq!(action, Some(Action::SwitchTab(index)));
                prop_assert!(ViewerTab::from_index(index).is_some());
            }
            _ => prop_assert!(action.is_none()),
        }
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let key = if use_vim {
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)
        } else {
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)
        };
        prop_assert_eq!(map_key(key), Some(Action::MoveDown));
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qnr?hjkl]") {
        let ch = key_char.chars().next().unwrap();
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert!(map_key(event).is_some(), "Key '{}' should map to an action", ch);
    }

    #[test]
    fn edit_mode_inserts_every_plain_char(ch in any::<char>()) {
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert_eq!(map_edit_key(event), Some(EditAction::Insert(ch)));
    }

    #[test]
    fn tab_cycle_round_trips(steps in 0usize..20) {
        let mut tab = ViewerTab::Overview;
        for _ in 0..steps {
            tab = tab.next();
        }
        for _ in 0..steps {
            tab = tab.previous();
        }
        prop_assert_eq!(tab, ViewerTab::Overview);
    }

    #[test]
    fn poll_interval_must_be_positive(interval in 0u64..10_000) {
        let mut config = base_config();
        config.poll_interval_ms = interval;
        prop_assert_eq!(config.validate().is_ok(), interval > 0);
    }
}
