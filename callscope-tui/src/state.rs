//! Application state and per-pane state definitions.

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::{map_edit_key, map_key, Action, EditAction};
use crate::nav::{Pane, ViewerTab};
use crate::notifications::{Notification, NotificationLevel};
use crate::poller::{spawn_poller, PollHandle};
use crate::theme::Theme;
use callscope_core::{
    BackendError, CallBackend, CallPoll, CallRequest, CallSnapshot, CallSummary, PhoneNumber,
    PollDirective, ValidationError, VAR_CUSTOMER_NAME, VAR_TODAY_DATE,
};
use crossterm::event::KeyEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const MAX_NOTIFICATIONS: usize = 20;

// ============================================================================
// TEXT INPUT
// ============================================================================

/// Single-line text field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

// ============================================================================
// FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Phone,
    CustomerName,
    TodayDate,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Phone => "Phone Number",
            FormField::CustomerName => "Customer Name",
            FormField::TodayDate => "Today's Date",
        }
    }

    pub fn all() -> &'static [FormField] {
        &[FormField::Phone, FormField::CustomerName, FormField::TodayDate]
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::Phone => FormField::CustomerName,
            FormField::CustomerName => FormField::TodayDate,
            FormField::TodayDate => FormField::Phone,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::Phone => FormField::TodayDate,
            FormField::CustomerName => FormField::Phone,
            FormField::TodayDate => FormField::CustomerName,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub phone: TextInput,
    pub customer_name: TextInput,
    pub today_date: TextInput,
    pub focus: FormField,
    pub editing: bool,
    /// Validation or submission error shown under the form.
    pub error: Option<String>,
    pub submitting: bool,
    pub last_created: Option<String>,
}

impl FormState {
    pub fn new(today: impl Into<String>) -> Self {
        Self {
            phone: TextInput::default(),
            customer_name: TextInput::default(),
            today_date: TextInput::with_value(today),
            focus: FormField::Phone,
            editing: false,
            error: None,
            submitting: false,
            last_created: None,
        }
    }

    pub fn input(&self, field: FormField) -> &TextInput {
        match field {
            FormField::Phone => &self.phone,
            FormField::CustomerName => &self.customer_name,
            FormField::TodayDate => &self.today_date,
        }
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInput {
        match self.focus {
            FormField::Phone => &mut self.phone,
            FormField::CustomerName => &mut self.customer_name,
            FormField::TodayDate => &mut self.today_date,
        }
    }

    pub fn build_request(&self) -> Result<CallRequest, ValidationError> {
        let phone = PhoneNumber::parse(self.phone.value())?;
        Ok(CallRequest::new(phone)
            .with_variable(VAR_CUSTOMER_NAME, self.customer_name.value())
            .with_variable(VAR_TODAY_DATE, self.today_date.value()))
    }

    /// Reset after a successful submission. The date is kept.
    pub fn on_created(&mut self, call_id: &str) {
        self.phone.clear();
        self.customer_name.clear();
        self.focus = FormField::Phone;
        self.editing = false;
        self.error = None;
        self.submitting = false;
        self.last_created = Some(call_id.to_string());
    }

    pub fn on_failed(&mut self, message: String) {
        self.error = Some(message);
        self.submitting = false;
    }
}

// ============================================================================
// CALL LIST
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CallListState {
    pub calls: Vec<CallSummary>,
    pub selected: Option<usize>,
    pub loading: bool,
    /// Set once any fetch has succeeded.
    pub loaded: bool,
    pub error: Option<String>,
}

impl CallListState {
    /// Replace the list wholesale, keeping the highlighted call if it is
    /// still present.
    pub fn replace(&mut self, calls: Vec<CallSummary>) {
        let previous = self.selected_call().map(|c| c.call_id.clone());
        self.calls = calls;
        self.selected = match previous {
            Some(id) => self
                .calls
                .iter()
                .position(|c| c.call_id == id)
                .or_else(|| (!self.calls.is_empty()).then_some(0)),
            None => (!self.calls.is_empty()).then_some(0),
        };
        self.loading = false;
        self.loaded = true;
        self.error = None;
    }

    /// Record a failed fetch. The current list is left intact.
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn selected_call(&self) -> Option<&CallSummary> {
        self.selected.and_then(|i| self.calls.get(i))
    }

    pub fn is_empty_state(&self) -> bool {
        self.loaded && self.calls.is_empty()
    }

    pub fn select_next(&mut self) {
        self.selected = select_next_index(self.calls.len(), self.selected);
    }

    pub fn select_previous(&mut self) {
        self.selected = select_prev_index(self.calls.len(), self.selected);
    }
}

fn select_next_index(len: usize, selected: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match selected {
        Some(i) if i < len => Some((i + 1) % len),
        _ => Some(0),
    }
}

fn select_prev_index(len: usize, selected: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match selected {
        Some(0) | None => Some(len - 1),
        Some(i) if i < len => Some(i - 1),
        Some(_) => Some(len - 1),
    }
}

// ============================================================================
// VIEWER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub poll: Option<CallPoll>,
    /// Bumped on every attach; fetch results from older attachments are
    /// discarded.
    pub generation: u64,
    pub tab: ViewerTab,
    pub scroll: u16,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            poll: None,
            generation: 0,
            tab: ViewerTab::Overview,
            scroll: 0,
        }
    }
}

impl ViewerState {
    pub fn attach(&mut self, call_id: &str) -> u64 {
        self.generation += 1;
        self.poll = Some(CallPoll::new(call_id));
        self.tab = ViewerTab::Overview;
        self.scroll = 0;
        self.generation
    }

    pub fn call_id(&self) -> Option<&str> {
        self.poll.as_ref().map(CallPoll::call_id)
    }

    /// Stop updating the current call but keep its last record on screen.
    /// Results still in flight are dropped.
    pub fn stop_polling(&mut self) {
        if let Some(poll) = self.poll.as_mut() {
            poll.stop();
            self.generation += 1;
        }
    }

    /// Apply a fetch result. `None` means it belonged to an earlier
    /// attachment and was dropped.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        call_id: &str,
        result: Result<CallSnapshot, BackendError>,
    ) -> Option<PollDirective> {
        if generation != self.generation {
            return None;
        }
        let poll = self.poll.as_mut().filter(|p| p.call_id() == call_id)?;
        Some(poll.apply(result))
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn set_tab(&mut self, tab: ViewerTab) {
        if self.tab != tab {
            self.tab = tab;
            self.scroll = 0;
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    backend: Arc<dyn CallBackend>,
    sender: mpsc::Sender<TuiEvent>,
    poll_handle: Option<PollHandle>,

    pub focus: Pane,
    pub form: FormState,
    pub calls: CallListState,
    pub viewer: ViewerState,

    pub notifications: Vec<Notification>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: TuiConfig,
        backend: Arc<dyn CallBackend>,
        sender: mpsc::Sender<TuiEvent>,
    ) -> Self {
        let theme = Theme::named(&config.theme.name);
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        Self {
            config,
            theme,
            backend,
            sender,
            poll_handle: None,
            focus: Pane::Form,
            form: FormState::new(today),
            calls: CallListState::default(),
            viewer: ViewerState::default(),
            notifications: Vec::new(),
            show_help: false,
            should_quit: false,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let excess = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..excess);
        }
    }

    pub fn poll_handle(&self) -> Option<&PollHandle> {
        self.poll_handle.as_ref()
    }

    /// Point the viewer at `call_id`, cancelling any poll in progress.
    pub fn attach_call(&mut self, call_id: &str) {
        if let Some(previous) = self.poll_handle.take() {
            previous.cancel();
            tracing::info!(
                call_id = previous.call_id(),
                generation = previous.generation(),
                "Polling cancelled"
            );
        }
        let generation = self.viewer.attach(call_id);
        self.poll_handle = Some(spawn_poller(
            Arc::clone(&self.backend),
            call_id.to_string(),
            generation,
            Duration::from_millis(self.config.poll_interval_ms),
            self.sender.clone(),
        ));
        self.focus = Pane::Call;
    }

    /// Stop polling the attached call. The viewer keeps showing it.
    pub fn detach_call(&mut self) {
        let Some(handle) = self.poll_handle.take() else {
            return;
        };
        handle.cancel();
        self.viewer.stop_polling();
        tracing::info!(
            call_id = handle.call_id(),
            generation = handle.generation(),
            "Polling stopped by user"
        );
        self.notify(
            NotificationLevel::Info,
            format!("Stopped watching call {}", handle.call_id()),
        );
    }

    /// Validate the form and start a create-call request. No-op while a
    /// request is already in flight.
    pub fn submit_form(&mut self) {
        if self.form.submitting {
            return;
        }
        let request = match self.form.build_request() {
            Ok(request) => request,
            Err(err) => {
                self.form.error = Some(err.to_string());
                return;
            }
        };
        self.form.error = None;
        self.form.submitting = true;
        tracing::info!(to_number = %request.to_number, "Submitting call");

        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = backend.create_call(&request).await;
            let _ = sender.send(TuiEvent::CallCreated(result)).await;
        });
    }

    /// Re-fetch the call list. No-op while a fetch is in flight.
    pub fn refresh_calls(&mut self) {
        if self.calls.loading {
            return;
        }
        self.calls.loading = true;
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = backend.list_calls().await;
            let _ = sender.send(TuiEvent::CallsListed(result)).await;
        });
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::CallFetched {
                generation,
                call_id,
                result,
            } => {
                let was_failing = self.viewer.poll.as_ref().and_then(CallPoll::error).is_some();
                match self.viewer.apply_fetch(generation, &call_id, result) {
                    Some(PollDirective::Stop) => {
                        tracing::info!(call_id = %call_id, generation, "Call reached final state");
                        self.poll_handle = None;
                    }
                    Some(PollDirective::Continue) => {
                        let error = self.viewer.poll.as_ref().and_then(CallPoll::error);
                        if let Some(error) = error.filter(|_| !was_failing) {
                            let message = format!("Call {}: {}", call_id, error);
                            self.notify(NotificationLevel::Warning, message);
                        }
                    }
                    None => {
                        tracing::debug!(call_id = %call_id, generation, "Discarded stale fetch");
                    }
                }
            }
            TuiEvent::CallCreated(result) => match result {
                Ok(created) => {
                    self.form.on_created(&created.call_id);
                    self.notify(
                        NotificationLevel::Success,
                        format!("Call created: {}", created.call_id),
                    );
                    self.attach_call(&created.call_id);
                    self.refresh_calls();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Call creation failed");
                    let message = err.to_string();
                    self.form.on_failed(message.clone());
                    self.notify(NotificationLevel::Error, message);
                }
            },
            TuiEvent::CallsListed(result) => match result {
                Ok(calls) => {
                    tracing::info!(count = calls.len(), "Call list refreshed");
                    self.calls.replace(calls);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Call list refresh failed");
                    let message = err.to_string();
                    self.calls.fail(message.clone());
                    self.notify(NotificationLevel::Error, message);
                }
            },
            TuiEvent::Tick | TuiEvent::Resize { .. } => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.focus == Pane::Form && self.form.editing {
            if let Some(action) = map_edit_key(key) {
                self.handle_edit_action(action);
            }
            return;
        }
        if let Some(action) = map_key(key) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                _ => self.show_help = false,
            }
            return;
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPane => self.focus = self.focus.next(),
            Action::PrevPane => self.focus = self.focus.previous(),
            Action::SwitchTab(index) => {
                if let Some(tab) = ViewerTab::from_index(index) {
                    self.viewer.set_tab(tab);
                }
            }
            Action::NextTab => self.viewer.set_tab(self.viewer.tab.next()),
            Action::PrevTab => self.viewer.set_tab(self.viewer.tab.previous()),
            Action::MoveDown => match self.focus {
                Pane::Form => self.form.focus = self.form.focus.next(),
                Pane::Calls => self.calls.select_next(),
                Pane::Call => self.viewer.scroll_down(),
            },
            Action::MoveUp => match self.focus {
                Pane::Form => self.form.focus = self.form.focus.previous(),
                Pane::Calls => self.calls.select_previous(),
                Pane::Call => self.viewer.scroll_up(),
            },
            Action::Confirm => match self.focus {
                Pane::Form => self.form.editing = true,
                Pane::Calls => {
                    if let Some(call_id) = self.calls.selected_call().map(|c| c.call_id.clone()) {
                        self.attach_call(&call_id);
                    }
                }
                Pane::Call => {}
            },
            Action::Refresh => self.refresh_calls(),
            Action::NewCall => {
                self.focus = Pane::Form;
                self.form.editing = true;
            }
            Action::OpenHelp => self.show_help = true,
            Action::Cancel => match self.focus {
                Pane::Call => self.detach_call(),
                Pane::Form => self.form.error = None,
                Pane::Calls => self.calls.error = None,
            },
        }
    }

    fn handle_edit_action(&mut self, action: EditAction) {
        match action {
            EditAction::Insert(c) => self.form.focused_input_mut().insert(c),
            EditAction::Backspace => self.form.focused_input_mut().backspace(),
            EditAction::Delete => self.form.focused_input_mut().delete(),
            EditAction::CursorLeft => self.form.focused_input_mut().left(),
            EditAction::CursorRight => self.form.focused_input_mut().right(),
            EditAction::Home => self.form.focused_input_mut().home(),
            EditAction::End => self.form.focused_input_mut().end(),
            EditAction::NextField => self.form.focus = self.form.focus.next(),
            EditAction::PrevField => self.form.focus = self.form.focus.previous(),
            EditAction::Submit => self.submit_form(),
            EditAction::Exit => self.form.editing = false,
            EditAction::Quit => self.should_quit = true,
        }
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: list selection always stays in bounds
        #[test]
        fn prop_selection_in_bounds(
            len in 0usize..20,
            start in proptest::option::of(0usize..40),
            moves in proptest::collection::vec(any::<bool>(), 0..50),
        ) {
            let mut selected = start;
            for forward in moves {
                selected = if forward {
                    select_next_index(len, selected)
                } else {
                    select_prev_index(len, selected)
                };
                match selected {
                    Some(i) => prop_assert!(i < len),
                    None => prop_assert_eq!(len, 0),
                }
            }
        }

        /// Property: next then previous returns to the same row
        #[test]
        fn prop_next_prev_inverse(len in 1usize..20, index in 0usize..20) {
            let index = index % len;
            let next = select_next_index(len, Some(index));
            prop_assert_eq!(select_prev_index(len, next), Some(index));
        }

        /// Property: the cursor never leaves the text
        #[test]
        fn prop_cursor_in_bounds(ops in proptest::collection::vec(0u8..7, 0..60)) {
            let mut input = TextInput::default();
            for op in ops {
                match op {
                    0 => input.insert('x'),
                    1 => input.insert('ü'),
                    2 => input.backspace(),
                    3 => input.delete(),
                    4 => input.left(),
                    5 => input.right(),
                    _ => input.home(),
                }
                prop_assert!(input.cursor() <= input.value().chars().count());
            }
        }
    }
}
