//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPane,
    PrevPane,
    SwitchTab(usize),
    NextTab,
    PrevTab,
    MoveUp,
    MoveDown,
    Confirm,
    Refresh,
    NewCall,
    OpenHelp,
    Cancel,
}

/// Keys while the form is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    Home,
    End,
    NextField,
    PrevField,
    Submit,
    Exit,
    Quit,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::NewCall),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextPane),
        KeyCode::BackTab => Some(Action::PrevPane),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevTab),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::NextTab),
        KeyCode::Char(c @ '1'..='5') => Some(Action::SwitchTab(c as usize - '1' as usize)),
        _ => None,
    }
}

pub fn map_edit_key(event: KeyEvent) -> Option<EditAction> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(EditAction::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(c) => Some(EditAction::Insert(c)),
        KeyCode::Backspace => Some(EditAction::Backspace),
        KeyCode::Delete => Some(EditAction::Delete),
        KeyCode::Left => Some(EditAction::CursorLeft),
        KeyCode::Right => Some(EditAction::CursorRight),
        KeyCode::Home => Some(EditAction::Home),
        KeyCode::End => Some(EditAction::End),
        KeyCode::Tab | KeyCode::Down => Some(EditAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(EditAction::PrevField),
        KeyCode::Enter => Some(EditAction::Submit),
        KeyCode::Esc => Some(EditAction::Exit),
        _ => None,
    }
}
