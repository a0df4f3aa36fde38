//! Performance tab: latency percentiles, token usage and the cost table.

use crate::views::helpers::or_na;
use crate::widgets::{DetailField, DetailSection};
use callscope_core::{
    format_cost, format_latency_ms, metric_explanation, stage_label, CallRecord, StageLatency,
    NOT_AVAILABLE,
};

pub const NO_METRICS: &str = "Performance metrics are not available yet.";

fn latency_text(value: Option<f64>) -> String {
    value
        .map(format_latency_ms)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn count_text(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}", v.round() as i64))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn stage_section(stage: &str, stats: &StageLatency) -> DetailSection {
    let mut section = DetailSection::new(stage_label(stage));
    let explanation = metric_explanation(stage);
    if !explanation.is_empty() {
        section = section.with_note(explanation);
    }
    section
        .field(DetailField::new("P50", latency_text(stats.p50)))
        .field(DetailField::new("P90", latency_text(stats.p90)))
        .field(DetailField::new("P95", latency_text(stats.p95)))
        .field(DetailField::new("Max", latency_text(stats.max)))
        .field(DetailField::new(
            "Count",
            stats
                .num
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ))
}

pub fn sections(record: &CallRecord) -> Vec<DetailSection> {
    let mut sections = Vec::new();

    let stages = record.latency_stages();
    if !stages.is_empty() {
        sections.push(DetailSection::new("Latency Metrics (ms)").with_note(
            "Performance measurements showing how quickly different components respond during the call",
        ));
        sections.extend(stages.into_iter().map(|(stage, stats)| stage_section(stage, stats)));
    }

    if let Some(usage) = &record.llm_token_usage {
        sections.push(
            DetailSection::new("LLM Token Usage")
                .with_note(
                    "Measures how much AI processing was required - tokens represent pieces of text the AI analyzed and generated",
                )
                .field(DetailField::new("Average Tokens", count_text(usage.average)))
                .field(DetailField::new(
                    "Total Requests",
                    usage
                        .num_requests
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ))
                .field(DetailField::new("Total Tokens", count_text(usage.total()))),
        );
    }

    if let Some(cost) = record.call_cost.as_ref().filter(|c| !c.product_costs.is_empty()) {
        let mut section = DetailSection::new("Cost Breakdown").with_note(
            "Detailed costs for each service used during the call (TTS, LLM processing, telephony, etc.)",
        );
        for product in &cost.product_costs {
            section.push(DetailField::new(
                or_na(product.product.as_deref()),
                format!(
                    "{} (unit price {})",
                    format_cost(product.cost),
                    format_cost(product.unit_price)
                ),
            ));
        }
        section.push(DetailField::new("Total", format_cost(cost.combined_cost)));
        sections.push(section);
    }

    sections
}
