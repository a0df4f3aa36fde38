//! Overview tab: call facts, timestamps, cost summary and analysis.

use crate::theme::{call_status_color, flag_color, Theme};
use crate::views::helpers::{or_na, yes_no};
use crate::widgets::{DetailField, DetailSection};
use callscope_core::{format_cost, format_duration, value_text, CallRecord, NOT_AVAILABLE};
use ratatui::style::Style;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn sections(record: &CallRecord, theme: &Theme) -> Vec<DetailSection> {
    let mut sections = vec![
        DetailSection::new("Call Information")
            .field(DetailField::new("Call ID", record.call_id.clone()))
            .field(
                DetailField::new("Status", record.call_status.to_string())
                    .styled(Style::default().fg(call_status_color(&record.call_status))),
            )
            .field(DetailField::new(
                "Direction",
                or_na(record.direction.as_ref().map(|d| d.as_str())),
            ))
            .field(DetailField::new("From", or_na(record.from_number.as_deref())))
            .field(DetailField::new("To", or_na(record.to_number.as_deref())))
            .field(DetailField::new("Agent", or_na(record.agent_name.as_deref())))
            .field(DetailField::new("Duration", format_duration(record.duration_ms)))
            .field(DetailField::new(
                "Disconnection",
                or_na(record.disconnection_reason.as_deref()),
            )),
        DetailSection::new("Timestamps")
            .field(DetailField::new("Started", record.started_display()))
            .field(DetailField::new("Ended", record.ended_display())),
    ];

    if let Some(cost) = &record.call_cost {
        sections.push(
            DetailSection::new("Cost Analysis")
                .field(DetailField::new("Total Cost", format_cost(cost.combined_cost)))
                .field(DetailField::new(
                    "Duration",
                    cost.total_duration_seconds
                        .map(|s| format!("{}s", s))
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ))
                .field(DetailField::new(
                    "Rate",
                    format!("{}/s", format_cost(cost.total_duration_unit_price)),
                )),
        );
    }

    if let Some(analysis) = &record.call_analysis {
        let mut section = DetailSection::new("AI Analysis")
            .field(
                DetailField::new("Call Successful", yes_no(analysis.call_successful))
                    .styled(Style::default().fg(flag_color(analysis.call_successful, theme))),
            )
            .field(DetailField::new(
                "User Sentiment",
                or_na(analysis.user_sentiment.as_deref()),
            ))
            .field(DetailField::new("Voicemail", yes_no(analysis.in_voicemail)));
        if let Some(summary) = analysis.call_summary.as_deref().filter(|s| !s.trim().is_empty()) {
            section.push(DetailField::new("Summary", summary));
        }
        sections.push(section);

        if let Some(custom) = analysis.custom_analysis_data.as_ref().filter(|m| !m.is_empty()) {
            let mut section = DetailSection::new("Custom Analysis");
            for (key, value) in custom {
                section.push(DetailField::new(key.clone(), value_text(value)));
            }
            sections.push(section);
        }
    }

    push_variables(&mut sections, "Dynamic Variables", record.dynamic_variables.as_ref());
    push_variables(
        &mut sections,
        "Collected Variables",
        record.collected_dynamic_variables.as_ref(),
    );
    sections
}

fn push_variables(
    sections: &mut Vec<DetailSection>,
    heading: &str,
    variables: Option<&BTreeMap<String, Value>>,
) {
    let Some(variables) = variables.filter(|v| !v.is_empty()) else {
        return;
    };
    let mut section = DetailSection::new(heading);
    for (key, value) in variables {
        section.push(DetailField::new(key.clone(), value_text(value)));
    }
    sections.push(section);
}
