//! Daily caller performance score.
//!
//! `score = visits * 40 + interested * 30 + call minutes * 0.2 + calls * 0.1`
//!
//! The weights are fixed company policy: a handful of visits or interested
//! students outweighs hours of calling.

use serde::Serialize;

use crate::model::call_data::DailyCallMetric;

pub const VISIT_WEIGHT: f64 = 40.0;
pub const INTERESTED_WEIGHT: f64 = 30.0;
pub const CALL_MINUTE_WEIGHT: f64 = 0.2;
pub const CALL_COUNT_WEIGHT: f64 = 0.1;

pub fn performance_score(
    visited_today: u32,
    interested_students: u32,
    total_call_time: u32,
    total_calls: u32,
) -> f64 {
    f64::from(visited_today) * VISIT_WEIGHT
        + f64::from(interested_students) * INTERESTED_WEIGHT
        + f64::from(total_call_time) * CALL_MINUTE_WEIGHT
        + f64::from(total_calls) * CALL_COUNT_WEIGHT
}

/// Rounded to one decimal place, as displayed.
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}", round_score(score))
}

/// Counter input as typed by a user: leading digits count, anything else is 0.
pub fn parse_metric(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed, |(i, _)| &trimmed[..i]);
    digits.parse().unwrap_or(0)
}

/// One employee's activity over a set of days (usually a month).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_calls: u64,
    pub total_call_time: u64,
    pub total_interested_students: u64,
    pub total_visited: u64,
    pub total_performance_score: f64,
    pub average_performance_score: f64,
    pub total_days_tracked: usize,
}

impl MonthlySummary {
    pub fn from_records(records: &[DailyCallMetric]) -> Self {
        let mut summary = records.iter().fold(Self::default(), |mut acc, r| {
            acc.total_calls += u64::from(r.metrics.total_calls);
            acc.total_call_time += u64::from(r.metrics.total_call_time);
            acc.total_interested_students += u64::from(r.metrics.interested_students);
            acc.total_visited += u64::from(r.metrics.visited_today);
            acc.total_performance_score += r.score();
            acc
        });

        summary.total_days_tracked = records.len();
        if !records.is_empty() {
            summary.average_performance_score =
                round_score(summary.total_performance_score / records.len() as f64);
        }
        summary
    }
}
