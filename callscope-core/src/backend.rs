//! The calling backend seam.
//!
//! The terminal client talks to the backend through this trait so the
//! poll scheduler and app state can run against a scripted backend in
//! tests.

use crate::error::BackendError;
use crate::phone::CallRequest;
use crate::record::CallSnapshot;
use crate::summary::CallSummary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response of a successful create-call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCall {
    pub call_id: String,
}

#[async_trait]
pub trait CallBackend: Send + Sync {
    /// `POST /api/calls/`
    async fn create_call(&self, request: &CallRequest) -> Result<CreatedCall, BackendError>;

    /// `GET /api/calls/{call_id}`
    async fn get_call(&self, call_id: &str) -> Result<CallSnapshot, BackendError>;

    /// `GET /api/calls/`
    async fn list_calls(&self) -> Result<Vec<CallSummary>, BackendError>;
}
