//! CallScope Core - Call Types
//!
//! Typed model of the calling backend's payloads, parsed once at the
//! boundary, plus the pure rules every client shares: phone validation,
//! display formatting, lookup tables and the poll state machine.
//! No I/O lives here; transports implement [`CallBackend`].

pub mod backend;
pub mod catalog;
pub mod error;
pub mod format;
pub mod phone;
pub mod poll;
pub mod record;
pub mod summary;

mod lenient;

pub use backend::{CallBackend, CreatedCall};
pub use catalog::{
    metric_explanation, role_label, stage_label, status_message, ANALYSIS_DELAY_HINT,
    LATENCY_STAGES,
};
pub use error::{BackendError, RecordError, ValidationError};
pub use format::{
    format_cost, format_datetime, format_duration, format_latency_ms, format_timestamp,
    short_call_id, NOT_AVAILABLE,
};
pub use phone::{CallRequest, PhoneNumber, VAR_CUSTOMER_NAME, VAR_TODAY_DATE};
pub use poll::{CallPoll, PollDirective, PollPhase};
pub use record::{
    CallAnalysis, CallCost, CallDirection, CallRecord, CallSnapshot, CallStatus, ProductCost,
    StageLatency, TokenUsage, TranscriptEntry, TranscriptRole, TranscriptWord, value_text,
};
pub use summary::CallSummary;

/// Opaque call identifier assigned by the calling service.
pub type CallId = String;
