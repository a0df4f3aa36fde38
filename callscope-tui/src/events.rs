//! Event types for the TUI event loop.

use callscope_core::{BackendError, CallSnapshot, CallSummary, CreatedCall};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// One poll fetch finished. `generation` identifies the attachment
    /// that issued it.
    CallFetched {
        generation: u64,
        call_id: String,
        result: Result<CallSnapshot, BackendError>,
    },
    CallCreated(Result<CreatedCall, BackendError>),
    CallsListed(Result<Vec<CallSummary>, BackendError>),
}
