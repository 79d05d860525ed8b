use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::employee::EmployeeLink;
use crate::models::flexible_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub clock_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub employee: Option<EmployeeLink>,
    /// Only set on the record echoed back with `ALREADY_CLOCKED_IN`.
    #[serde(default)]
    pub can_clock_out: Option<bool>,
}

impl Attendance {
    pub fn hours(&self) -> f64 {
        self.total_hours.unwrap_or(0.0)
    }
}

/// What the dashboard shows for today.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStatus {
    pub clocked_in: bool,
    pub clocked_out: bool,
    pub clock_in_time: Option<DateTime<Utc>>,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub total_hours: f64,
    pub status: String,
}

impl TodayStatus {
    pub fn from_record(record: Option<&Attendance>) -> Self {
        match record {
            Some(r) => Self {
                clocked_in: r.clock_in.is_some(),
                clocked_out: r.clock_out.is_some(),
                clock_in_time: r.clock_in,
                clock_out_time: r.clock_out,
                total_hours: r.hours(),
                status: r.status.clone().unwrap_or_else(|| "Present".to_string()),
            },
            None => Self {
                clocked_in: false,
                clocked_out: false,
                clock_in_time: None,
                clock_out_time: None,
                total_hours: 0.0,
                status: "Not Set".to_string(),
            },
        }
    }
}

/// Hours logged in the given calendar month.
pub fn monthly_hours(records: &[Attendance], year: i32, month: u32) -> f64 {
    records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .map(Attendance::hours)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, hours: Option<f64>) -> Attendance {
        Attendance {
            id: String::new(),
            date: flexible_date::parse(date).unwrap(),
            clock_in: None,
            clock_out: None,
            total_hours: hours,
            status: None,
            employee: None,
            can_clock_out: None,
        }
    }

    #[test]
    fn monthly_hours_only_counts_the_month() {
        let records = vec![
            record("2024-03-01", Some(8.0)),
            record("2024-03-02", Some(7.5)),
            record("2024-03-03", None),
            record("2024-02-29", Some(9.0)),
            record("2023-03-04", Some(9.0)),
        ];
        assert_eq!(monthly_hours(&records, 2024, 3), 15.5);
    }

    #[test]
    fn missing_record_means_not_set() {
        let status = TodayStatus::from_record(None);
        assert!(!status.clocked_in);
        assert_eq!(status.status, "Not Set");
    }

    #[test]
    fn parses_backend_record() {
        let raw = r#"{
            "_id": "a1",
            "date": "2024-03-01T00:00:00.000Z",
            "clockIn": "2024-03-01T09:00:00.000Z",
            "clockOut": null,
            "status": "Present"
        }"#;
        let r: Attendance = serde_json::from_str(raw).unwrap();
        let status = TodayStatus::from_record(Some(&r));
        assert!(status.clocked_in);
        assert!(!status.clocked_out);
        assert_eq!(status.status, "Present");
    }
}
