//! CallScope Test Utilities
//!
//! Centralized test infrastructure for the CallScope workspace:
//! - A scripted in-memory backend
//! - Proptest generators for backend payloads
//! - Test fixtures for each stage of the call lifecycle
//! - Custom assertions for CallScope-specific validation

pub use callscope_core::{
    BackendError, CallBackend, CallPoll, CallRecord, CallRequest, CallSnapshot, CallStatus,
    CallSummary, CreatedCall, PhoneNumber, PollDirective, PollPhase,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// SCRIPTED BACKEND
// ============================================================================

type Scripted<T> = VecDeque<Result<T, BackendError>>;

/// In-memory [`CallBackend`] that replays scripted responses.
///
/// Each queue is consumed front to back; the last response is sticky, so
/// a queue of one answers every request the same way. Unscripted calls
/// answer like the backend does for an unknown id.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    calls: Mutex<HashMap<String, Scripted<Value>>>,
    creates: Mutex<Scripted<CreatedCall>>,
    lists: Mutex<Scripted<Vec<CallSummary>>>,
    get_delay: Option<Duration>,
    get_log: Mutex<Vec<String>>,
    create_log: Mutex<Vec<CallRequest>>,
    list_count: Mutex<usize>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `get_call` by `delay` of tokio time.
    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = Some(delay);
        self
    }

    /// Queue a record payload for `call_id`.
    pub fn push_call(&self, call_id: &str, payload: Value) -> &Self {
        self.push_call_result(call_id, Ok(payload))
    }

    pub fn push_call_error(&self, call_id: &str, err: BackendError) -> &Self {
        self.push_call_result(call_id, Err(err))
    }

    fn push_call_result(&self, call_id: &str, result: Result<Value, BackendError>) -> &Self {
        lock(&self.calls)
            .entry(call_id.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn push_create(&self, result: Result<CreatedCall, BackendError>) -> &Self {
        lock(&self.creates).push_back(result);
        self
    }

    pub fn push_list(&self, result: Result<Vec<CallSummary>, BackendError>) -> &Self {
        lock(&self.lists).push_back(result);
        self
    }

    /// Ids passed to `get_call`, in order.
    pub fn fetched_ids(&self) -> Vec<String> {
        lock(&self.get_log).clone()
    }

    pub fn fetch_count(&self, call_id: &str) -> usize {
        lock(&self.get_log).iter().filter(|id| *id == call_id).count()
    }

    pub fn created_requests(&self) -> Vec<CallRequest> {
        lock(&self.create_log).clone()
    }

    pub fn list_count(&self) -> usize {
        *lock(&self.list_count)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn next_scripted<T: Clone>(queue: &mut Scripted<T>) -> Option<Result<T, BackendError>> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl CallBackend for ScriptedBackend {
    async fn create_call(&self, request: &CallRequest) -> Result<CreatedCall, BackendError> {
        lock(&self.create_log).push(request.clone());
        next_scripted(&mut lock(&self.creates)).unwrap_or_else(|| {
            Err(BackendError::Rejected {
                status: 500,
                detail: "Failed to create call".to_string(),
            })
        })
    }

    async fn get_call(&self, call_id: &str) -> Result<CallSnapshot, BackendError> {
        lock(&self.get_log).push(call_id.to_string());
        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = lock(&self.calls)
            .get_mut(call_id)
            .and_then(|queue| next_scripted(queue));
        match scripted {
            Some(Ok(payload)) => Ok(CallSnapshot::from_value(payload)?),
            Some(Err(err)) => Err(err),
            None => Err(BackendError::Rejected {
                status: 404,
                detail: "Call not found".to_string(),
            }),
        }
    }

    async fn list_calls(&self) -> Result<Vec<CallSummary>, BackendError> {
        *lock(&self.list_count) += 1;
        next_scripted(&mut lock(&self.lists)).unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for backend payloads.

    use super::*;
    use proptest::prelude::*;

    /// A number that passes E.164 validation.
    pub fn arb_e164() -> impl Strategy<Value = String> {
        "\\+[1-9][0-9]{1,14}"
    }

    /// Known statuses plus an occasional unknown one.
    pub fn arb_status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("created".to_string()),
            Just("registered".to_string()),
            Just("ongoing".to_string()),
            Just("ended".to_string()),
            "[a-z_]{3,12}",
        ]
    }

    /// Values of the wrong shape for almost any field.
    pub fn arb_junk() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z ]{0,8}".prop_map(Value::String),
            Just(json!([1, "two", null])),
            Just(json!({ "unexpected": true })),
        ]
    }

    /// A record payload where every enrichment field may be absent,
    /// well-formed, or junk.
    pub fn arb_record_payload() -> impl Strategy<Value = Value> {
        (
            "call_[a-z0-9]{8,16}",
            arb_status(),
            prop::option::of(0i64..3_600_000),
            prop::option::of(prop_oneof![
                Just(fixtures::analysis_block()),
                arb_junk()
            ]),
            prop::option::of(prop_oneof![Just(fixtures::latency_block()), arb_junk()]),
            prop::option::of(prop_oneof![Just(fixtures::cost_block()), arb_junk()]),
            prop::option::of(prop_oneof![Just(fixtures::tool_call_transcript()), arb_junk()]),
        )
            .prop_map(|(id, status, duration, analysis, latency, cost, turns)| {
                let mut payload = json!({ "call_id": id, "call_status": status });
                let fields = [
                    ("duration_ms", duration.map(|d| json!(d))),
                    ("call_analysis", analysis),
                    ("latency", latency),
                    ("call_cost", cost),
                    ("transcript_with_tool_calls", turns),
                ];
                for (key, value) in fields {
                    if let Some(value) = value {
                        payload[key] = value;
                    }
                }
                payload
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Payloads for each stage of the call lifecycle.

    use super::*;

    pub const START_MS: i64 = 1_700_000_000_000;

    pub fn phone() -> PhoneNumber {
        PhoneNumber::parse("+14155550123").unwrap_or_else(|e| panic!("fixture phone: {e}"))
    }

    pub fn registered_call(call_id: &str) -> Value {
        json!({
            "call_id": call_id,
            "call_status": "registered",
            "direction": "outbound",
            "to_number": "+14155550123",
            "from_number": "+14155550000",
            "agent_id": "agent_1",
            "agent_name": "Support Agent"
        })
    }

    pub fn ongoing_call(call_id: &str) -> Value {
        let mut payload = registered_call(call_id);
        payload["call_status"] = json!("ongoing");
        payload["start_timestamp"] = json!(START_MS);
        payload["transcript"] = json!("Agent: Hello, is this Ada?\nUser: Yes, speaking.");
        payload
    }

    /// Ended, but the analysis has not been produced yet.
    pub fn ended_call(call_id: &str) -> Value {
        let mut payload = ongoing_call(call_id);
        payload["call_status"] = json!("ended");
        payload["end_timestamp"] = json!(START_MS + 65_000);
        payload["duration_ms"] = json!(65_000);
        payload["disconnection_reason"] = json!("user_hangup");
        payload
    }

    /// Ended with analysis and every enrichment block present.
    pub fn completed_call(call_id: &str) -> Value {
        let mut payload = ended_call(call_id);
        payload["call_analysis"] = analysis_block();
        payload["transcript_object"] = json!([
            { "role": "agent", "content": "Hello, is this Ada?" },
            { "role": "user", "content": "Yes, speaking." }
        ]);
        payload["transcript_with_tool_calls"] = tool_call_transcript();
        payload["latency"] = latency_block();
        payload["llm_token_usage"] = json!({
            "values": [812, 944, 1020],
            "average": 925.33,
            "num_requests": 3
        });
        payload["call_cost"] = cost_block();
        payload["recording_url"] = json!("https://media.example.com/rec.wav");
        payload["recording_multi_channel_url"] = json!("https://media.example.com/rec-multi.wav");
        payload["public_log_url"] = json!("https://media.example.com/log.txt");
        payload["retell_llm_dynamic_variables"] = json!({
            "customer_name": "Ada",
            "today_date": "2026-10-19"
        });
        payload
    }

    pub fn analysis_block() -> Value {
        json!({
            "call_summary": "Customer confirmed the appointment.",
            "in_voicemail": false,
            "user_sentiment": "Positive",
            "call_successful": true,
            "custom_analysis_data": { "appointment_confirmed": true }
        })
    }

    pub fn latency_block() -> Value {
        json!({
            "e2e": { "p50": 812.4, "p90": 1100, "p95": 1250.6, "p99": 1400, "min": 600, "max": 1500, "num": 12 },
            "llm": { "p50": 420, "p90": 610, "p95": 700, "max": 880, "num": 12 },
            "tts": { "p50": 150 }
        })
    }

    pub fn cost_block() -> Value {
        json!({
            "product_costs": [
                { "product": "elevenlabs_tts", "cost": 60, "unit_price": 0.07 },
                { "product": "gpt_4o", "cost": 30, "unit_price": 0.05 }
            ],
            "total_duration_seconds": 65,
            "total_duration_unit_price": 0.1,
            "combined_cost": 1234
        })
    }

    pub fn tool_call_transcript() -> Value {
        json!([
            {
                "role": "agent",
                "content": "Let me check your booking.",
                "words": [
                    { "word": "Let", "start": 0.5, "end": 0.7 },
                    { "word": "booking.", "start": 1.4, "end": 1.9 }
                ]
            },
            {
                "role": "tool_call_invocation",
                "tool_call_id": "tc_1",
                "tool_name": "lookup_booking",
                "arguments": "{\"customer\":\"Ada\"}",
                "time_sec": 2.1
            },
            {
                "role": "tool_call_result",
                "tool_call_id": "tc_1",
                "result": { "found": true }
            },
            { "role": "user", "content": "Great, thanks." }
        ])
    }

    pub fn summary(call_id: &str, status: &str) -> CallSummary {
        CallSummary {
            call_id: call_id.to_string(),
            call_status: CallStatus::from(status),
            to_number: Some("+14155550123".to_string()),
            from_number: Some("+14155550000".to_string()),
            agent_name: Some("Support Agent".to_string()),
            start_timestamp: Some(START_MS),
            duration_ms: (status == "ended").then_some(65_000),
            ..Default::default()
        }
    }

    pub fn summaries_payload() -> Value {
        json!([
            {
                "call_id": "call_00000000aaaa1111",
                "call_status": "ended",
                "direction": "outbound",
                "to_number": "+14155550123",
                "start_timestamp": START_MS,
                "duration_ms": 65000,
                "has_analysis": true,
                "has_recording": true,
                "call_cost": 1234
            },
            {
                "call_id": "call_00000000bbbb2222",
                "call_status": "ongoing",
                "direction": "inbound",
                "from_number": "+442071838750",
                "to_number": "+14155550000"
            }
        ])
    }

    pub fn snapshot(payload: Value) -> CallSnapshot {
        CallSnapshot::from_value(payload).unwrap_or_else(|e| panic!("fixture snapshot: {e}"))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for CallScope-specific validation.

    use super::*;

    /// Assert that a backend result is a rejection with the given status.
    #[track_caller]
    pub fn assert_rejected<T: std::fmt::Debug>(result: &Result<T, BackendError>, status: u16) {
        match result {
            Err(BackendError::Rejected { status: got, .. }) => {
                assert_eq!(*got, status, "Wrong HTTP status in rejection");
            }
            other => panic!("Expected Rejected({}), got: {:?}", status, other),
        }
    }

    /// Assert the user-visible message of a failed backend result.
    #[track_caller]
    pub fn assert_error_message<T: std::fmt::Debug>(
        result: &Result<T, BackendError>,
        expected: &str,
    ) {
        match result {
            Err(err) => assert_eq!(err.to_string(), expected),
            Ok(value) => panic!("Expected error '{}', got Ok: {:?}", expected, value),
        }
    }

    /// Assert the poll's phase and polling flag together.
    #[track_caller]
    pub fn assert_poll_state(poll: &CallPoll, phase: PollPhase, polling: bool) {
        assert_eq!(poll.phase(), phase, "Wrong poll phase");
        assert_eq!(poll.is_polling(), polling, "Wrong polling flag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lifecycle_fixtures_parse() {
        let ongoing = fixtures::snapshot(fixtures::ongoing_call("c"));
        assert_eq!(ongoing.record.call_status, CallStatus::Ongoing);
        assert!(!ongoing.is_terminal());

        let ended = fixtures::snapshot(fixtures::ended_call("c"));
        assert!(ended.record.call_status.is_ended());
        assert!(!ended.is_terminal());

        let completed = fixtures::snapshot(fixtures::completed_call("c"));
        assert!(completed.is_terminal());
        assert_eq!(completed.record.structured_transcript().map(|t| t.len()), Some(4));
        assert_eq!(completed.record.latency_stages().len(), 3);
        assert_eq!(
            completed.record.call_cost.as_ref().map(|c| c.product_costs.len()),
            Some(2)
        );
    }

    #[test]
    fn test_summaries_payload_parses() {
        let summaries: Vec<CallSummary> =
            serde_json::from_value(fixtures::summaries_payload()).unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].has_analysis);
        assert!(summaries[1].is_inbound());
    }

    #[tokio::test]
    async fn test_scripted_backend_last_response_sticky() {
        let backend = ScriptedBackend::new();
        backend
            .push_call("c", fixtures::ongoing_call("c"))
            .push_call("c", fixtures::completed_call("c"));

        let first = backend.get_call("c").await.unwrap();
        let second = backend.get_call("c").await.unwrap();
        let third = backend.get_call("c").await.unwrap();
        assert_eq!(first.record.call_status, CallStatus::Ongoing);
        assert!(second.is_terminal());
        assert!(third.is_terminal());
        assert_eq!(backend.fetch_count("c"), 3);
    }

    #[tokio::test]
    async fn test_scripted_backend_unknown_call() {
        let backend = ScriptedBackend::new();
        let result = backend.get_call("missing").await;
        assertions::assert_rejected(&result, 404);
        assertions::assert_error_message(&result, "Call not found");
    }

    #[tokio::test]
    async fn test_scripted_backend_records_requests() {
        let backend = ScriptedBackend::new();
        backend.push_create(Ok(CreatedCall {
            call_id: "call_new".to_string(),
        }));
        let created = backend
            .create_call(&CallRequest::new(fixtures::phone()))
            .await
            .unwrap();
        assert_eq!(created.call_id, "call_new");
        assert_eq!(backend.created_requests().len(), 1);
        assert!(backend.list_calls().await.unwrap().is_empty());
        assert_eq!(backend.list_count(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: generated payloads always parse at the boundary
        #[test]
        fn prop_generated_payloads_parse(payload in generators::arb_record_payload()) {
            prop_assert!(CallSnapshot::from_value(payload).is_ok());
        }

        /// Property: generated numbers pass validation
        #[test]
        fn prop_generated_numbers_valid(number in generators::arb_e164()) {
            prop_assert!(PhoneNumber::parse(&number).is_ok());
        }
    }
}
