//! Stop timestamps, durations and punctuality.

use chrono::NaiveDateTime;
use regex::Regex;

use super::patterns::{
    CLOCK_TIME, DELIVERY_DURATION_LABEL, DURATION_WINDOW, NORMALIZED_DATE_TIME, NO_DURATION,
    STANDING_DURATION_LABEL,
};
use super::ruleset::{GeneralRules, RuleSet, TimestampRules};
use super::FallbackChain;
use crate::models::record::StopTimestamps;
use crate::pdf::clean_spaces;

/// Longest plausible duration in minutes; anything above is a data error.
const MAX_DURATION_MINUTES: i64 = 12 * 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Normalize a printed date-time to `YYYY/MM/DD, HH:MM`.
///
/// Formats are tried in order; a value none of them accepts is returned
/// cleaned but otherwise unchanged.
pub fn normalize_date_time(raw: &str, formats: &[String]) -> String {
    let cleaned = clean_spaces(raw);
    if cleaned.is_empty() {
        return cleaned;
    }

    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())
        .map(|dt| dt.format(NORMALIZED_DATE_TIME).to_string())
        .unwrap_or(cleaned)
}

/// Parse a normalized date-time; empty and `--` are absent.
pub fn parse_normalized(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() || value == NO_DURATION {
        return None;
    }
    NaiveDateTime::parse_from_str(value, NORMALIZED_DATE_TIME).ok()
}

/// Wall-clock difference between two normalized date-times as `HH:MM`.
///
/// A negative difference wraps through midnight. Anything still negative or
/// above twelve hours yields `00:00`; an unparseable endpoint yields an empty string.
pub fn hhmm_delta(from: &str, to: &str) -> String {
    let (Some(from), Some(to)) = (parse_normalized(from), parse_normalized(to)) else {
        return String::new();
    };

    let mut minutes = (to - from).num_minutes();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    if !(0..=MAX_DURATION_MINUTES).contains(&minutes) {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// First labelled date-time in `text`, normalized.
pub fn time_after_label(text: &str, labels: &[Regex], general: &GeneralRules) -> String {
    labels
        .iter()
        .find_map(|label| label.captures(text))
        .map(|caps| normalize_date_time(&caps[1], &general.date_formats))
        .unwrap_or_default()
}

/// Duration printed in the row under a duration label.
///
/// The first non-blank line within the window decides: a time after a
/// date-time literal, else any time outside a date-time literal, else `--`.
fn tabular_duration(
    text: &str,
    label: &Regex,
    general: &GeneralRules,
    timestamps: &TimestampRules,
) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();

    for (index, line) in lines.iter().enumerate() {
        if !label.is_match(line) {
            continue;
        }

        let Some(row) = lines
            .iter()
            .skip(index + 1)
            .take(DURATION_WINDOW)
            .find(|row| !clean_spaces(row).is_empty())
        else {
            continue;
        };

        if let Some(caps) = timestamps.duration_after_date.captures(row) {
            if let Some(duration) = caps.get(caps.len() - 1) {
                return Some(duration.as_str().to_string());
            }
        }

        let rest = general.date_time.replace_all(row, "");
        if let Some(caps) = CLOCK_TIME.captures(&rest) {
            return Some(caps[1].to_string());
        }
        if rest.contains(NO_DURATION) {
            return Some(NO_DURATION.to_string());
        }
    }

    None
}

/// Punctuality status, with the deviation in parentheses when captured.
pub fn punctuality(text: &str, patterns: &[Regex]) -> String {
    patterns
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| {
            let status = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            match caps.get(2).map(|m| m.as_str()).filter(|q| !q.is_empty()) {
                Some(qualifier) => format!("{status} ({qualifier})"),
                None => status.to_string(),
            }
        })
        .unwrap_or_default()
}

/// Extract the stop timeline of page 1.
pub fn extract_stop(text: &str, rules: &RuleSet) -> StopTimestamps {
    let general = &rules.general;
    let labels = &rules.timestamps;
    let at = |field: &[Regex]| time_after_label(text, field, general);

    let mut stop = StopTimestamps {
        planned_arrival: at(&labels.planned_arrival),
        actual_arrival: at(&labels.actual_arrival),
        delivery_start: at(&labels.delivery_start),
        delivery_end: at(&labels.delivery_end),
        departure: at(&labels.departure),
        punctuality: punctuality(text, &labels.punctuality),
        ..StopTimestamps::default()
    };

    stop.delivery_duration = FallbackChain::new("Lieferzeit")
        .then("table row", || {
            tabular_duration(text, &DELIVERY_DURATION_LABEL, general, labels)
        })
        .then("start to end", || {
            Some(hhmm_delta(&stop.delivery_start, &stop.delivery_end))
        })
        .run()
        .unwrap_or_default();

    stop.standing_duration = FallbackChain::new("Standzeit")
        .then("table row", || {
            tabular_duration(text, &STANDING_DURATION_LABEL, general, labels)
        })
        .then("end to departure", || {
            (!stop.departure.is_empty()).then(|| hhmm_delta(&stop.delivery_end, &stop.departure))
        })
        .run()
        .unwrap_or_else(|| NO_DURATION.to_string());

    stop
}
