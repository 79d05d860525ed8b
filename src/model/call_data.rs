use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::employee::{EmployeeLink, EmployeeSummary};
use crate::models::{flexible_date, lenient_f64};
use crate::scoring;

/// The four daily counters a caller reports.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallMetrics {
    pub visited_today: u32,
    pub interested_students: u32,
    /// minutes
    pub total_call_time: u32,
    pub total_calls: u32,
}

impl CallMetrics {
    pub fn score(&self) -> f64 {
        scoring::performance_score(
            self.visited_today,
            self.interested_students,
            self.total_call_time,
            self.total_calls,
        )
    }
}

/// One employee's tracked activity for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCallMetric {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub employee: Option<EmployeeLink>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub metrics: CallMetrics,
    #[serde(default)]
    pub notes: Option<String>,
    /// Computed by the backend; never edited directly.
    #[serde(default)]
    pub performance_score: Option<f64>,
}

impl DailyCallMetric {
    /// Score of record, or the local preview when the backend sent none.
    pub fn score(&self) -> f64 {
        self.performance_score.unwrap_or_else(|| self.metrics.score())
    }
}

/// Body of `POST /api/calls` and `PUT /api/calls/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDataInput {
    /// Only set when an admin records data for someone else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub metrics: CallMetrics,
    pub notes: String,
}

impl CallDataInput {
    /// Update bodies carry only the editable fields.
    pub fn for_update(&self) -> CallDataInput {
        CallDataInput {
            employee: None,
            date: None,
            metrics: self.metrics,
            notes: self.notes.clone(),
        }
    }
}

/// Filters of `GET /api/calls/all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallDataQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "flexible_date::option"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformerStats {
    pub employee: Option<EmployeeSummary>,
    #[serde(deserialize_with = "lenient_f64")]
    pub performance_score: f64,
    pub record_count: u32,
    pub total_visited: u64,
    pub total_interested_students: u64,
    pub total_call_time: u64,
    pub total_calls: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverallStats {
    pub total_employees_tracked: u64,
    pub total_visited: u64,
    pub total_interested_students: u64,
    pub total_call_time: u64,
    pub total_calls: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub average_performance_score: f64,
}

/// Payload of `GET /api/calls/performance/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceStats {
    pub performance_data: Vec<PerformerStats>,
    pub top_performer: Option<PerformerStats>,
    pub overall_stats: Option<OverallStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_flattens_metrics() {
        let raw = r#"{
            "_id": "c1",
            "employee": "e1",
            "date": "2024-03-01T00:00:00.000Z",
            "visitedToday": 2,
            "interestedStudents": 1,
            "totalCallTime": 120,
            "totalCalls": 50,
            "notes": "",
            "performanceScore": 139.0
        }"#;
        let r: DailyCallMetric = serde_json::from_str(raw).unwrap();
        assert_eq!(r.metrics.visited_today, 2);
        assert_eq!(r.metrics.total_call_time, 120);
        assert_eq!(r.score(), 139.0);
        assert_eq!(r.employee.as_ref().map(EmployeeLink::id), Some("e1"));
    }

    #[test]
    fn missing_counters_are_zero() {
        let raw = r#"{"_id":"c2","date":"2024-03-01","visitedToday":1}"#;
        let r: DailyCallMetric = serde_json::from_str(raw).unwrap();
        assert_eq!(r.metrics.total_calls, 0);
        assert_eq!(r.score(), 40.0);
    }

    #[test]
    fn update_body_drops_employee_and_date() {
        let input = CallDataInput {
            employee: Some("e1".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            metrics: CallMetrics { total_calls: 10, ..Default::default() },
            notes: "follow up".into(),
        };
        let create = serde_json::to_value(&input).unwrap();
        let update = serde_json::to_value(input.for_update()).unwrap();
        assert_eq!(create["employee"], "e1");
        assert_eq!(create["date"], "2024-03-01");
        assert_eq!(create["totalCalls"], 10);
        assert!(update.get("employee").is_none());
        assert!(update.get("date").is_none());
        assert_eq!(update["notes"], "follow up");
    }

    #[test]
    fn stats_accept_preformatted_average() {
        let raw = r#"{"performanceData":[],"overallStats":{"totalCalls":5,"averagePerformanceScore":"42.5"}}"#;
        let stats: PerformanceStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.overall_stats.unwrap().average_performance_score, 42.5);
        assert!(stats.top_performer.is_none());
    }
}
