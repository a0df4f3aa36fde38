//! List-view projection returned by `GET /api/calls/`.

use crate::format::{format_cost, format_duration, format_timestamp, short_call_id};
use crate::lenient;
use crate::record::{CallDirection, CallStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSummary {
    pub call_id: String,
    #[serde(default)]
    pub call_status: CallStatus,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub to_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub from_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub agent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub agent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub direction: Option<CallDirection>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub start_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub end_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    pub duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub disconnection_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_analysis: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_recording: bool,
    /// Combined cost in hundredths of a currency unit.
    #[serde(default, deserialize_with = "lenient::optional")]
    pub call_cost: Option<f64>,
}

impl CallSummary {
    pub fn is_inbound(&self) -> bool {
        matches!(self.direction, Some(CallDirection::Inbound))
    }

    pub fn direction_marker(&self) -> &'static str {
        if self.is_inbound() {
            "IN "
        } else {
            "OUT"
        }
    }

    /// The other party: the caller for inbound calls, the callee otherwise.
    pub fn counterpart(&self) -> String {
        if self.is_inbound() {
            format!("From: {}", self.from_number.as_deref().unwrap_or_default())
        } else {
            format!("To: {}", self.to_number.as_deref().unwrap_or_default())
        }
    }

    pub fn agent_display(&self) -> &str {
        self.agent_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Agent")
    }

    /// Start time, or end time when the call never started.
    pub fn when(&self) -> String {
        format_timestamp(self.start_timestamp.or(self.end_timestamp))
    }

    /// One-line row used by the call list.
    pub fn row_label(&self) -> String {
        let mut label = format!(
            "{} {} | {} | {} | {} | {}",
            self.direction_marker(),
            short_call_id(&self.call_id),
            self.counterpart(),
            self.when(),
            self.call_status,
            format_duration(self.duration_ms)
        );
        if self.has_analysis {
            label.push_str(" | analysis");
        }
        if self.has_recording {
            label.push_str(" | recording");
        }
        if self.call_cost.is_some() {
            label.push_str(" | ");
            label.push_str(&format_cost(self.call_cost));
        }
        label
    }
}
