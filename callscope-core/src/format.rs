//! Display formatting shared by every view.
//!
//! These rules are part of the client's observable contract; keep the
//! output byte-for-byte stable.

use chrono::{DateTime, Local, Utc};

/// Placeholder for absent or unusable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Values above this are epoch milliseconds, below it epoch seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Milliseconds as `M:SS`. Absent or non-positive durations are `N/A`.
pub fn format_duration(duration_ms: Option<i64>) -> String {
    match duration_ms {
        Some(ms) if ms > 0 => {
            let seconds = ms / 1000;
            format!("{}:{:02}", seconds / 60, seconds % 60)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Epoch seconds or milliseconds as a local date and time.
pub fn format_timestamp(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp.filter(|ts| *ts != 0) else {
        return NOT_AVAILABLE.to_string();
    };
    let millis = if ts > EPOCH_MILLIS_THRESHOLD {
        Some(ts)
    } else {
        ts.checked_mul(1000)
    };
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| format_datetime(&at))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Hundredths of a currency unit as dollars with four decimals.
pub fn format_cost(cost: Option<f64>) -> String {
    match cost {
        Some(value) if value.is_finite() => format!("${:.4}", value / 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_latency_ms(value: f64) -> String {
    format!("{}ms", value.round() as i64)
}

/// Last eight characters of a call id, for compact list rows.
pub fn short_call_id(call_id: &str) -> String {
    let count = call_id.chars().count();
    call_id.chars().skip(count.saturating_sub(8)).collect()
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: positive durations always render as minutes and two-digit seconds
        #[test]
        fn prop_duration_shape(ms in 1i64..100_000_000) {
            let text = format_duration(Some(ms));
            let (minutes, seconds) = text.split_once(':').unwrap();
            prop_assert_eq!(seconds.len(), 2);
            prop_assert_eq!(minutes.parse::<i64>().unwrap(), ms / 1000 / 60);
            prop_assert_eq!(seconds.parse::<i64>().unwrap(), (ms / 1000) % 60);
        }

        /// Property: seconds and the equivalent milliseconds show the same wall clock
        #[test]
        fn prop_timestamp_units_agree(seconds in 1_000_000_001i64..4_000_000_000) {
            prop_assert_eq!(
                format_timestamp(Some(seconds)),
                format_timestamp(Some(seconds * 1000))
            );
        }

        /// Property: integer costs keep exactly four decimals
        #[test]
        fn prop_cost_four_decimals(cents in 0i64..10_000_000) {
            let text = format_cost(Some(cents as f64));
            prop_assert!(text.starts_with('$'));
            let (_, decimals) = text.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 4);
        }
    }
}
