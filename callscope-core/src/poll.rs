//! Polling state for one attached call.
//!
//! `CallPoll` is pure: the runtime feeds it fetch outcomes and it decides
//! whether another fetch is due. Timing and cancellation live with the
//! caller.

use crate::catalog::{status_message, ANALYSIS_DELAY_HINT};
use crate::error::BackendError;
use crate::record::{CallRecord, CallSnapshot};

/// What the poller should do after a fetch outcome has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDirective {
    Continue,
    Stop,
}

/// Display phase of the attached call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Nothing fetched yet.
    Fetching,
    /// Nothing fetched and the last attempt failed.
    Error,
    DisplayingInProgress,
    DisplayingFinal,
}

#[derive(Debug, Clone)]
pub struct CallPoll {
    call_id: String,
    snapshot: Option<CallSnapshot>,
    error: Option<String>,
    polling: bool,
    fetches: u64,
    failures: u64,
}

impl CallPoll {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            snapshot: None,
            error: None,
            polling: true,
            fetches: 0,
            failures: 0,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn snapshot(&self) -> Option<&CallSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn record(&self) -> Option<&CallRecord> {
        self.snapshot.as_ref().map(|snap| &snap.record)
    }

    /// Message from the most recent failed fetch, cleared on success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    pub fn failure_count(&self) -> u64 {
        self.failures
    }

    /// Apply one fetch outcome.
    ///
    /// A success replaces the record wholesale. A failure keeps whatever
    /// was displayed before and never stops polling.
    pub fn apply(&mut self, outcome: Result<CallSnapshot, BackendError>) -> PollDirective {
        if !self.polling {
            return PollDirective::Stop;
        }
        self.fetches += 1;
        match outcome {
            Ok(snapshot) => {
                let terminal = snapshot.is_terminal();
                self.snapshot = Some(snapshot);
                self.error = None;
                if terminal {
                    self.polling = false;
                    return PollDirective::Stop;
                }
            }
            Err(err) => {
                self.failures += 1;
                self.error = Some(err.to_string());
            }
        }
        PollDirective::Continue
    }

    /// Stop polling without a terminal record, e.g. when detaching.
    pub fn stop(&mut self) {
        self.polling = false;
    }

    pub fn phase(&self) -> PollPhase {
        match (&self.snapshot, &self.error) {
            (None, None) => PollPhase::Fetching,
            (None, Some(_)) => PollPhase::Error,
            (Some(snap), _) if snap.is_terminal() => PollPhase::DisplayingFinal,
            (Some(_), _) => PollPhase::DisplayingInProgress,
        }
    }

    /// Human-readable status line for the current record.
    pub fn status_line(&self) -> String {
        match self.record() {
            Some(record) => status_message(&record.call_status, record.has_analysis()),
            None if self.error.is_some() => "Unable to load call".to_string(),
            None => "Loading call details...".to_string(),
        }
    }

    /// Hint shown while an ended call is still waiting for analysis.
    pub fn pending_hint(&self) -> Option<&'static str> {
        let record = self.record()?;
        (self.polling && record.call_status.is_ended() && !record.has_analysis())
            .then_some(ANALYSIS_DELAY_HINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snap(value: serde_json::Value) -> CallSnapshot {
        CallSnapshot::from_value(value).unwrap()
    }

    fn transport(msg: &str) -> BackendError {
        BackendError::Transport(msg.to_string())
    }

    #[test]
    fn test_initial_phase_is_fetching() {
        let poll = CallPoll::new("call_1");
        assert_eq!(poll.phase(), PollPhase::Fetching);
        assert!(poll.is_polling());
        assert_eq!(poll.status_line(), "Loading call details...");
        assert!(poll.pending_hint().is_none());
    }

    #[test]
    fn test_error_before_any_record() {
        let mut poll = CallPoll::new("call_1");
        let directive = poll.apply(Err(transport("connection refused")));
        assert_eq!(directive, PollDirective::Continue);
        assert_eq!(poll.phase(), PollPhase::Error);
        assert_eq!(poll.error(), Some("Network error: connection refused"));
        assert!(poll.is_polling());
    }

    #[test]
    fn test_error_keeps_previous_record() {
        let mut poll = CallPoll::new("c");
        poll.apply(Ok(snap(json!({ "call_id": "c", "call_status": "ongoing" }))));
        poll.apply(Err(BackendError::Rejected {
            status: 502,
            detail: "upstream unavailable".to_string(),
        }));
        assert_eq!(poll.phase(), PollPhase::DisplayingInProgress);
        assert_eq!(poll.record().unwrap().call_id, "c");
        assert_eq!(poll.error(), Some("upstream unavailable"));
        assert_eq!(poll.status_line(), "Call in progress...");
    }

    #[test]
    fn test_success_clears_error() {
        let mut poll = CallPoll::new("c");
        poll.apply(Err(transport("timeout")));
        poll.apply(Ok(snap(json!({ "call_id": "c", "call_status": "registered" }))));
        assert!(poll.error().is_none());
        assert_eq!(poll.failure_count(), 1);
        assert_eq!(poll.fetch_count(), 2);
    }

    #[test]
    fn test_ended_without_analysis_keeps_polling() {
        let mut poll = CallPoll::new("c");
        let directive = poll.apply(Ok(snap(json!({ "call_id": "c", "call_status": "ended" }))));
        assert_eq!(directive, PollDirective::Continue);
        assert_eq!(poll.phase(), PollPhase::DisplayingInProgress);
        assert_eq!(poll.pending_hint(), Some(ANALYSIS_DELAY_HINT));
        assert_eq!(poll.status_line(), "Call ended, generating analysis...");
    }

    #[test]
    fn test_terminal_record_stops() {
        let mut poll = CallPoll::new("c");
        let directive = poll.apply(Ok(snap(json!({
            "call_id": "c",
            "call_status": "ended",
            "call_analysis": {}
        }))));
        assert_eq!(directive, PollDirective::Stop);
        assert_eq!(poll.phase(), PollPhase::DisplayingFinal);
        assert!(!poll.is_polling());
        assert!(poll.pending_hint().is_none());

        // Late outcomes after the stop are ignored.
        assert_eq!(poll.apply(Err(transport("late"))), PollDirective::Stop);
        assert!(poll.error().is_none());
        assert_eq!(poll.fetch_count(), 1);
    }

    #[test]
    fn test_record_replaced_wholesale() {
        let mut poll = CallPoll::new("c");
        poll.apply(Ok(snap(json!({
            "call_id": "c",
            "call_status": "ongoing",
            "transcript": "Agent: hello"
        }))));
        poll.apply(Ok(snap(json!({ "call_id": "c", "call_status": "ongoing" }))));
        assert!(poll.record().unwrap().transcript.is_none());
    }

    #[test]
    fn test_manual_stop() {
        let mut poll = CallPoll::new("c");
        poll.stop();
        assert!(!poll.is_polling());
        assert_eq!(
            poll.apply(Ok(snap(json!({ "call_id": "c" })))),
            PollDirective::Stop
        );
        assert_eq!(poll.phase(), PollPhase::Fetching);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn outcome_strategy() -> impl Strategy<Value = Option<(&'static str, bool)>> {
        prop::option::of((
            prop::sample::select(vec!["created", "registered", "ongoing", "ended", "error"]),
            any::<bool>(),
        ))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: polling stops exactly at the first ended record with analysis
        #[test]
        fn prop_stops_only_when_terminal(outcomes in prop::collection::vec(outcome_strategy(), 1..30)) {
            let mut poll = CallPoll::new("c");
            let mut stopped = false;
            for outcome in outcomes {
                let result = match outcome {
                    Some((status, analysis)) => {
                        let mut value = json!({ "call_id": "c", "call_status": status });
                        if analysis {
                            value["call_analysis"] = json!({});
                        }
                        Ok(CallSnapshot::from_value(value).unwrap())
                    }
                    None => Err(BackendError::Transport("boom".to_string())),
                };
                let expect_stop = stopped
                    || matches!(&result, Ok(snap) if snap.is_terminal());
                let directive = poll.apply(result);
                prop_assert_eq!(directive == PollDirective::Stop, expect_stop);
                stopped = expect_stop;
                prop_assert_eq!(poll.is_polling(), !stopped);
            }
        }

        /// Property: once a record is shown, errors never remove it
        #[test]
        fn prop_errors_never_clear_record(errors in 1usize..10) {
            let mut poll = CallPoll::new("c");
            poll.apply(Ok(CallSnapshot::from_value(json!({ "call_id": "c", "call_status": "ongoing" })).unwrap()));
            for _ in 0..errors {
                poll.apply(Err(BackendError::Transport("boom".to_string())));
            }
            prop_assert!(poll.record().is_some());
            prop_assert_eq!(poll.phase(), PollPhase::DisplayingInProgress);
        }
    }
}
