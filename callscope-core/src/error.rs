//! Error types for CallScope operations

use thiserror::Error;

/// Client-side validation errors. These never reach the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a phone number")]
    MissingPhoneNumber,

    #[error("Please enter a valid phone number in E.164 format (e.g., +14155550123)")]
    InvalidPhoneNumber { value: String },
}

/// Failures talking to the calling backend.
///
/// `Display` is the single human-readable line shown inline by whichever
/// component hit the error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Non-success HTTP response. `detail` is the body's `detail` field or
    /// the operation's generic message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A payload that cannot be turned into a [`crate::CallRecord`] at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("call record must be a JSON object")]
    NotAnObject,

    #[error("call record has no call_id")]
    MissingCallId,

    #[error("invalid call record JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Json(err.to_string())
    }
}

impl From<RecordError> for BackendError {
    fn from(err: RecordError) -> Self {
        BackendError::Decode(err.to_string())
    }
}
