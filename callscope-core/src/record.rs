//! Call record as returned by `GET /api/calls/{call_id}`.
//!
//! The calling service owns this record and enriches it as the call
//! progresses. Everything except the identifier is optional; see the
//! `lenient` helpers for how malformed fields degrade.

use crate::catalog::LATENCY_STAGES;
use crate::error::RecordError;
use crate::format::{format_datetime, format_timestamp, NOT_AVAILABLE};
use crate::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Lifecycle status reported by the calling service.
///
/// Unknown values are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallStatus {
    Created,
    Registered,
    Ongoing,
    Ended,
    Other(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Created => "created",
            CallStatus::Registered => "registered",
            CallStatus::Ongoing => "ongoing",
            CallStatus::Ended => "ended",
            CallStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, CallStatus::Ended)
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        CallStatus::Other("unknown".to_string())
    }
}

impl From<&str> for CallStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "created" => CallStatus::Created,
            "registered" => CallStatus::Registered,
            "ongoing" => CallStatus::Ongoing,
            "ended" => CallStatus::Ended,
            other => CallStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CallStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CallStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .map(CallStatus::from)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallDirection {
    Inbound,
    Outbound,
    Other(String),
}

impl CallDirection {
    pub fn as_str(&self) -> &str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
            CallDirection::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for CallDirection {
    fn from(raw: &str) -> Self {
        match raw {
            "inbound" => CallDirection::Inbound,
            "outbound" => CallDirection::Outbound,
            other => CallDirection::Other(other.to_string()),
        }
    }
}

impl Serialize for CallDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CallDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CallDirection::from(raw.as_str()))
    }
}

// ============================================================================
// ENRICHMENT BLOCKS
// ============================================================================

/// Post-call analysis, computed asynchronously after the call ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallAnalysis {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub call_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub in_voicemail: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub user_sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub call_successful: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub custom_analysis_data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptRole {
    Agent,
    User,
    ToolCallInvocation,
    ToolCallResult,
    Other(String),
}

impl TranscriptRole {
    pub fn as_str(&self) -> &str {
        match self {
            TranscriptRole::Agent => "agent",
            TranscriptRole::User => "user",
            TranscriptRole::ToolCallInvocation => "tool_call_invocation",
            TranscriptRole::ToolCallResult => "tool_call_result",
            TranscriptRole::Other(raw) => raw.as_str(),
        }
    }
}

impl Default for TranscriptRole {
    fn default() -> Self {
        TranscriptRole::Other("unknown".to_string())
    }
}

impl From<&str> for TranscriptRole {
    fn from(raw: &str) -> Self {
        match raw {
            "agent" => TranscriptRole::Agent,
            "user" => TranscriptRole::User,
            "tool_call_invocation" => TranscriptRole::ToolCallInvocation,
            "tool_call_result" => TranscriptRole::ToolCallResult,
            other => TranscriptRole::Other(other.to_string()),
        }
    }
}

impl Serialize for TranscriptRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TranscriptRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .map(TranscriptRole::from)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub word: Option<String>,
    pub start: f64,
    pub end: f64,
}

/// One turn of a structured transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub role: TranscriptRole,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub words: Vec<TranscriptWord>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub tool_call_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub tool_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub arguments: Option<Value>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub time_sec: Option<f64>,
}

impl TranscriptEntry {
    /// Start of the first word and end of the last word, in seconds.
    pub fn word_span(&self) -> Option<(f64, f64)> {
        let first = self.words.first()?;
        let last = self.words.last()?;
        Some((first.start, last.end))
    }

    pub fn arguments_text(&self) -> Option<String> {
        self.arguments.as_ref().map(value_text)
    }

    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(value_text)
    }
}

/// Percentile statistics for one pipeline stage, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageLatency {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub p50: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub p90: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub p95: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub p99: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub num: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub values: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub average: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub num_requests: Option<i64>,
}

impl TokenUsage {
    pub fn total(&self) -> Option<f64> {
        self.values.as_ref().map(|values| values.iter().sum())
    }
}

/// One billed service. Amounts are in hundredths of a currency unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCost {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallCost {
    #[serde(default, deserialize_with = "lenient::list")]
    pub product_costs: Vec<ProductCost>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_duration_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_duration_unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub combined_cost: Option<f64>,
}

// ============================================================================
// CALL RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    #[serde(default)]
    pub call_status: CallStatus,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub direction: Option<CallDirection>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub from_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub to_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub agent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub agent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_datetime")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub start_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub end_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub disconnection_reason: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub call_analysis: Option<CallAnalysis>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub transcript: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub transcript_object: Vec<TranscriptEntry>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub transcript_with_tool_calls: Vec<TranscriptEntry>,
    #[serde(default, deserialize_with = "lenient::object_entries")]
    pub latency: Option<BTreeMap<String, StageLatency>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub llm_token_usage: Option<TokenUsage>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub call_cost: Option<CallCost>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub recording_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub recording_multi_channel_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub scrubbed_recording_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub scrubbed_recording_multi_channel_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub public_log_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub knowledge_base_retrieved_contents_url: Option<String>,

    #[serde(
        default,
        rename = "retell_llm_dynamic_variables",
        deserialize_with = "lenient::optional"
    )]
    pub dynamic_variables: Option<BTreeMap<String, Value>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub collected_dynamic_variables: Option<BTreeMap<String, Value>>,
}

impl CallRecord {
    pub fn has_analysis(&self) -> bool {
        self.call_analysis.is_some()
    }

    /// Ended with analysis present: nothing further will change.
    pub fn is_terminal(&self) -> bool {
        self.call_status.is_ended() && self.has_analysis()
    }

    /// The structured turn sequence to display, tool-call-aware first.
    pub fn structured_transcript(&self) -> Option<&[TranscriptEntry]> {
        if !self.transcript_with_tool_calls.is_empty() {
            Some(&self.transcript_with_tool_calls)
        } else if !self.transcript_object.is_empty() {
            Some(&self.transcript_object)
        } else {
            None
        }
    }

    /// Plain transcript text, if non-blank.
    pub fn plain_transcript(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Latency stages in pipeline order; unknown stages follow alphabetically.
    pub fn latency_stages(&self) -> Vec<(&str, &StageLatency)> {
        let Some(latency) = &self.latency else {
            return Vec::new();
        };
        let mut stages: Vec<(&str, &StageLatency)> = LATENCY_STAGES
            .iter()
            .filter_map(|key| latency.get_key_value(*key))
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        stages.extend(
            latency
                .iter()
                .filter(|(k, _)| !LATENCY_STAGES.contains(&k.as_str()))
                .map(|(k, v)| (k.as_str(), v)),
        );
        stages
    }

    /// Call start for display, falling back to the record's creation time.
    pub fn started_display(&self) -> String {
        display_with_fallback(self.start_timestamp, self.created_at)
    }

    /// Call end for display, falling back to the record's end time.
    pub fn ended_display(&self) -> String {
        display_with_fallback(self.end_timestamp, self.ended_at)
    }
}

fn display_with_fallback(timestamp: Option<i64>, fallback: Option<DateTime<Utc>>) -> String {
    let primary = format_timestamp(timestamp);
    if primary != NOT_AVAILABLE {
        return primary;
    }
    fallback
        .map(|at| format_datetime(&at))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Strings are shown as-is; anything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// The latest fetched record, typed, alongside the payload it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSnapshot {
    pub record: CallRecord,
    pub raw: Value,
}

impl CallSnapshot {
    /// Parse a backend payload at the boundary.
    pub fn from_value(raw: Value) -> Result<Self, RecordError> {
        let object = raw.as_object().ok_or(RecordError::NotAnObject)?;
        match object.get("call_id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err(RecordError::MissingCallId),
        }
        let record = serde_json::from_value::<CallRecord>(raw.clone())?;
        Ok(Self { record, raw })
    }

    pub fn is_terminal(&self) -> bool {
        self.record.is_terminal()
    }

    /// The payload pretty-printed for the raw view.
    pub fn raw_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> CallSnapshot {
        CallSnapshot::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_record_parses() {
        let snap = snapshot(json!({ "call_id": "call_1" }));
        assert_eq!(snap.record.call_id, "call_1");
        assert_eq!(snap.record.call_status, CallStatus::default());
        assert!(!snap.record.has_analysis());
        assert!(snap.record.structured_transcript().is_none());
        assert!(snap.record.latency_stages().is_empty());
    }

    #[test]
    fn test_missing_call_id_rejected() {
        assert_eq!(
            CallSnapshot::from_value(json!({ "call_status": "ended" })),
            Err(RecordError::MissingCallId)
        );
        assert_eq!(
            CallSnapshot::from_value(json!(["call_1"])),
            Err(RecordError::NotAnObject)
        );
    }

    #[test]
    fn test_unknown_status_preserved() {
        let snap = snapshot(json!({ "call_id": "c", "call_status": "error" }));
        assert_eq!(snap.record.call_status, CallStatus::Other("error".to_string()));
        assert_eq!(snap.record.call_status.to_string(), "error");
    }

    #[test]
    fn test_terminal_requires_ended_and_analysis() {
        let pending = snapshot(json!({ "call_id": "c", "call_status": "ended" }));
        assert!(!pending.is_terminal());

        let done = snapshot(json!({
            "call_id": "c",
            "call_status": "ended",
            "call_analysis": { "call_successful": true }
        }));
        assert!(done.is_terminal());

        let ongoing = snapshot(json!({
            "call_id": "c",
            "call_status": "ongoing",
            "call_analysis": {}
        }));
        assert!(!ongoing.is_terminal());
    }

    #[test]
    fn test_null_analysis_is_absent() {
        let snap = snapshot(json!({
            "call_id": "c",
            "call_status": "ended",
            "call_analysis": null
        }));
        assert!(!snap.record.has_analysis());
    }

    #[test]
    fn test_malformed_enrichment_degrades() {
        let snap = snapshot(json!({
            "call_id": "c",
            "call_status": "ended",
            "call_cost": "free",
            "latency": 12,
            "duration_ms": "long",
            "transcript_object": { "role": "agent" },
            "llm_token_usage": { "values": "lots", "average": 10.4 }
        }));
        assert!(snap.record.call_cost.is_none());
        assert!(snap.record.latency.is_none());
        assert!(snap.record.duration_ms.is_none());
        assert!(snap.record.transcript_object.is_empty());
        let usage = snap.record.llm_token_usage.unwrap();
        assert!(usage.values.is_none());
        assert_eq!(usage.average, Some(10.4));
    }

    #[test]
    fn test_tool_call_transcript_preferred() {
        let snap = snapshot(json!({
            "call_id": "c",
            "transcript": "Agent: hi",
            "transcript_object": [{ "role": "agent", "content": "hi" }],
            "transcript_with_tool_calls": [
                { "role": "agent", "content": "hi" },
                { "role": "tool_call_invocation", "tool_name": "lookup", "arguments": "{\"id\":1}" }
            ]
        }));
        let turns = snap.record.structured_transcript().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role, TranscriptRole::ToolCallInvocation);
        assert_eq!(turns[1].arguments_text().as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn test_word_span() {
        let entry: TranscriptEntry = serde_json::from_value(json!({
            "role": "user",
            "content": "hello there",
            "words": [
                { "word": "hello", "start": 1.25, "end": 1.5 },
                { "word": "there", "start": 1.6, "end": 2.0 }
            ]
        }))
        .unwrap();
        assert_eq!(entry.word_span(), Some((1.25, 2.0)));
    }

    #[test]
    fn test_latency_stage_order() {
        let snap = snapshot(json!({
            "call_id": "c",
            "latency": {
                "tts": { "p50": 100 },
                "custom_stage": { "p50": 1 },
                "e2e": { "p50": 900, "num": 4 },
                "asr": null
            }
        }));
        let keys: Vec<&str> = snap
            .record
            .latency_stages()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["e2e", "tts", "custom_stage"]);
    }

    #[test]
    fn test_token_total() {
        let usage = TokenUsage {
            values: Some(vec![100.0, 250.0, 50.0]),
            average: None,
            num_requests: Some(3),
        };
        assert_eq!(usage.total(), Some(400.0));
        assert_eq!(TokenUsage::default().total(), None);
    }

    #[test]
    fn test_timestamp_fallbacks() {
        let snap = snapshot(json!({
            "call_id": "c",
            "created_at": "2024-03-01T10:00:00Z"
        }));
        assert_ne!(snap.record.started_display(), NOT_AVAILABLE);
        assert_eq!(snap.record.ended_display(), NOT_AVAILABLE);
    }

    #[test]
    fn test_dynamic_variables_renamed_field() {
        let snap = snapshot(json!({
            "call_id": "c",
            "retell_llm_dynamic_variables": { "customer_name": "Ada" }
        }));
        let vars = snap.record.dynamic_variables.unwrap();
        assert_eq!(vars.get("customer_name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_raw_pretty_is_verbatim() {
        let snap = snapshot(json!({ "call_id": "c", "vendor_field": [1, 2] }));
        let pretty = snap.raw_pretty();
        assert!(pretty.contains("vendor_field"));
        assert!(pretty.contains("\"call_id\": \"c\""));
    }
}
