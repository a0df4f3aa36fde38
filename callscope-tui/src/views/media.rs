//! Media tab: recording, log and knowledge-base links.

use crate::widgets::{DetailField, DetailSection};
use callscope_core::CallRecord;

pub const MEDIA_NOTE: &str =
    "Audio recordings, execution logs, and knowledge base content retrieved during the call";
pub const NO_MEDIA: &str = "No media available for this call yet.";

fn link(heading: &str, note: &str, url: Option<&str>) -> Option<DetailSection> {
    let url = url.filter(|u| !u.trim().is_empty())?;
    Some(
        DetailSection::new(heading)
            .with_note(note)
            .field(DetailField::new("URL", url)),
    )
}

pub fn sections(record: &CallRecord) -> Vec<DetailSection> {
    let links = [
        link(
            "Call Recording",
            "Standard mono audio recording of the entire conversation",
            record.recording_url.as_deref(),
        ),
        link(
            "Multi-Channel Recording",
            "Stereo recording with agent and user on separate channels for advanced analysis",
            record.recording_multi_channel_url.as_deref(),
        ),
        link(
            "Scrubbed Recording",
            "Recording with sensitive information removed",
            record.scrubbed_recording_url.as_deref(),
        ),
        link(
            "Scrubbed Multi-Channel Recording",
            "Multi-channel recording with sensitive information removed",
            record.scrubbed_recording_multi_channel_url.as_deref(),
        ),
        link(
            "Public Logs",
            "Detailed execution logs showing call flow, API calls, and system events",
            record.public_log_url.as_deref(),
        ),
        link(
            "Knowledge Base Content",
            "Information retrieved from knowledge sources to answer user questions",
            record.knowledge_base_retrieved_contents_url.as_deref(),
        ),
    ];
    links.into_iter().flatten().collect()
}
