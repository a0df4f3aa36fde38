//! Well-known lookup tables: status messages, latency stages, turn roles.

use crate::record::{CallStatus, TranscriptRole};

/// Shown while an ended call is still waiting for its analysis.
pub const ANALYSIS_DELAY_HINT: &str = "Analysis typically takes 30-60 seconds after call completion";

/// Latency stages in pipeline order.
pub const LATENCY_STAGES: &[&str] = &[
    "e2e",
    "asr",
    "llm",
    "llm_websocket_network_rtt",
    "tts",
    "knowledge_base",
    "s2s",
];

pub fn status_message(status: &CallStatus, has_analysis: bool) -> String {
    match status {
        CallStatus::Created => "Call created, initiating...".to_string(),
        CallStatus::Registered => "Call registered, connecting...".to_string(),
        CallStatus::Ongoing => "Call in progress...".to_string(),
        CallStatus::Ended if has_analysis => "Call completed with analysis".to_string(),
        CallStatus::Ended => "Call ended, generating analysis...".to_string(),
        CallStatus::Other(raw) => format!("Status: {}", raw),
    }
}

/// Explanation for a latency stage; empty for stages we do not know.
pub fn metric_explanation(stage: &str) -> &'static str {
    match stage {
        "e2e" => "End-to-End: Total response time from user speech to agent audio output",
        "asr" => "Automatic Speech Recognition: Time to convert speech to text",
        "llm" => "Large Language Model: Time for AI to process and generate responses",
        "llm_websocket_network_rtt" => "LLM Network RTT: Round-trip time for LLM API calls",
        "tts" => "Text-to-Speech: Time to convert AI response text to audio",
        "knowledge_base" => {
            "Knowledge Base: Time to retrieve relevant information from knowledge sources"
        }
        "s2s" => "Speech-to-Speech: Direct speech processing without intermediate text conversion",
        _ => "",
    }
}

pub fn stage_label(stage: &str) -> String {
    match stage {
        "llm_websocket_network_rtt" => "LLM NETWORK RTT".to_string(),
        other => other.replace('_', " ").to_uppercase(),
    }
}

pub fn role_label(role: &TranscriptRole) -> String {
    match role {
        TranscriptRole::Agent => "Agent".to_string(),
        TranscriptRole::User => "User".to_string(),
        TranscriptRole::ToolCallInvocation => "Tool Call".to_string(),
        TranscriptRole::ToolCallResult => "Tool Result".to_string(),
        TranscriptRole::Other(raw) => raw.clone(),
    }
}
