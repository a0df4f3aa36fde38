//! REST client for the calling backend.

use crate::config::TuiConfig;
use async_trait::async_trait;
use callscope_core::{
    BackendError, CallBackend, CallRequest, CallSnapshot, CallSummary, CreatedCall,
};
use serde_json::Value;
use std::time::Duration;

pub const CREATE_CALL_FAILED: &str = "Failed to create call";
pub const GET_CALL_FAILED: &str = "Failed to get call status";
pub const LIST_CALLS_FAILED: &str = "Failed to get calls list";

const CALLS_PATH: &str = "/api/calls/";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Non-success status; `detail` is already the user-facing message.
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<ApiClientError> for BackendError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Status { status, detail } => BackendError::Rejected { status, detail },
            ApiClientError::Http(inner) if inner.is_decode() => {
                BackendError::Decode(inner.to_string())
            }
            ApiClientError::Http(inner) => BackendError::Transport(inner.to_string()),
            ApiClientError::Serde(inner) => BackendError::Decode(inner.to_string()),
            ApiClientError::InvalidResponse(message) => BackendError::Decode(message),
            ApiClientError::Config(message) => BackendError::Transport(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiClientError::Config(format!("invalid api_base_url: {}", e)))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_call(&self, request: &CallRequest) -> Result<CreatedCall, ApiClientError> {
        let body = self
            .post_json(&self.calls_url()?, request, CREATE_CALL_FAILED)
            .await?;
        let created: CreatedCall = serde_json::from_value(body)?;
        if created.call_id.trim().is_empty() {
            return Err(ApiClientError::InvalidResponse(
                "create call response has an empty call_id".to_string(),
            ));
        }
        tracing::info!(call_id = %created.call_id, "Call created");
        Ok(created)
    }

    pub async fn get_call(&self, call_id: &str) -> Result<CallSnapshot, ApiClientError> {
        let body = self.get_json(&self.call_url(call_id)?, GET_CALL_FAILED).await?;
        CallSnapshot::from_value(body)
            .map_err(|e| ApiClientError::InvalidResponse(e.to_string()))
    }

    /// List entries that cannot be read as a summary are skipped.
    pub async fn list_calls(&self) -> Result<Vec<CallSummary>, ApiClientError> {
        let body = self.get_json(&self.calls_url()?, LIST_CALLS_FAILED).await?;
        let Value::Array(items) = body else {
            return Err(ApiClientError::InvalidResponse(
                "calls list is not a JSON array".to_string(),
            ));
        };
        let total = items.len();
        let summaries: Vec<CallSummary> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if summaries.len() < total {
            tracing::warn!(
                skipped = total - summaries.len(),
                "Skipped unreadable call summaries"
            );
        }
        Ok(summaries)
    }

    fn calls_url(&self) -> Result<reqwest::Url, ApiClientError> {
        reqwest::Url::parse(&format!("{}{}", self.base_url, CALLS_PATH))
            .map_err(|e| ApiClientError::Config(e.to_string()))
    }

    /// The id is pushed as one path segment so it is escaped as needed.
    fn call_url(&self, call_id: &str) -> Result<reqwest::Url, ApiClientError> {
        let mut url = self.calls_url()?;
        url.path_segments_mut()
            .map_err(|_| ApiClientError::Config("api_base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(call_id);
        Ok(url)
    }

    async fn get_json(&self, url: &reqwest::Url, fallback: &str) -> Result<Value, ApiClientError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        parse_response(response, fallback).await
    }

    async fn post_json<B>(
        &self,
        url: &reqwest::Url,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ApiClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        tracing::debug!(%url, "POST");
        let response = self.client.post(url.clone()).json(body).send().await?;
        parse_response(response, fallback).await
    }
}

async fn parse_response(response: reqwest::Response, fallback: &str) -> Result<Value, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }
    let text = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %text, "Backend rejected request");
    Err(ApiClientError::Status {
        status: status.as_u16(),
        detail: error_detail(&text).unwrap_or_else(|| fallback.to_string()),
    })
}

/// The `detail` string of a JSON error body, when there is a usable one.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl CallBackend for RestClient {
    async fn create_call(&self, request: &CallRequest) -> Result<CreatedCall, BackendError> {
        Ok(RestClient::create_call(self, request).await?)
    }

    async fn get_call(&self, call_id: &str) -> Result<CallSnapshot, BackendError> {
        Ok(RestClient::get_call(self, call_id).await?)
    }

    async fn list_calls(&self) -> Result<Vec<CallSummary>, BackendError> {
        Ok(RestClient::list_calls(self).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::with_base_url(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail": "Invalid phone number"}"#).as_deref(),
            Some("Invalid phone number")
        );
        assert_eq!(error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(error_detail(r#"{"detail": ["loc", "msg"]}"#), None);
        assert_eq!(error_detail(r#"{"message": "nope"}"#), None);
        assert_eq!(error_detail("<html>502</html>"), None);
    }

    #[test]
    fn test_urls_built_from_base() {
        let rest = client("http://localhost:8000/");
        assert_eq!(rest.base_url(), "http://localhost:8000");
        assert_eq!(
            rest.calls_url().unwrap().as_str(),
            "http://localhost:8000/api/calls/"
        );
        assert_eq!(
            rest.call_url("call_123").unwrap().as_str(),
            "http://localhost:8000/api/calls/call_123"
        );
    }

    #[test]
    fn test_call_id_is_escaped() {
        let rest = client("http://localhost:8000");
        assert_eq!(
            rest.call_url("a/b c").unwrap().as_str(),
            "http://localhost:8000/api/calls/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(matches!(
            RestClient::with_base_url("not a url", Duration::from_secs(1)),
            Err(ApiClientError::Config(_))
        ));
    }

    #[test]
    fn test_status_error_maps_to_rejection() {
        let err: BackendError = ApiClientError::Status {
            status: 400,
            detail: "Invalid phone number".to_string(),
        }
        .into();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Invalid phone number");
    }
}
