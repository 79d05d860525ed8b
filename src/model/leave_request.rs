use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::leave::duration::calculate_days;
use crate::model::employee::EmployeeLink;
use crate::models::flexible_date;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveType {
    #[strum(to_string = "Vacation")]
    Vacation,
    #[serde(rename = "Sick Leave")]
    #[strum(to_string = "Sick Leave", serialize = "sick")]
    SickLeave,
    #[serde(rename = "Personal Leave")]
    #[strum(to_string = "Personal Leave", serialize = "personal")]
    PersonalLeave,
    #[serde(rename = "Emergency Leave")]
    #[strum(to_string = "Emergency Leave", serialize = "emergency")]
    EmergencyLeave,
    #[serde(rename = "Maternity Leave")]
    #[strum(to_string = "Maternity Leave", serialize = "maternity")]
    MaternityLeave,
    #[serde(rename = "Paternity Leave")]
    #[strum(to_string = "Paternity Leave", serialize = "paternity")]
    PaternityLeave,
    #[serde(rename = "Bereavement Leave")]
    #[strum(to_string = "Bereavement Leave", serialize = "bereavement")]
    BereavementLeave,
}

impl LeaveType {
    /// Longest request accepted for this type, in days.
    pub fn max_days(&self) -> Option<f64> {
        match self {
            LeaveType::Vacation => Some(7.0),
            LeaveType::SickLeave => Some(3.0),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Planned time off for personal activities",
            LeaveType::SickLeave => "Medical leave for illness or injury",
            LeaveType::PersonalLeave => "Time off for personal matters",
            LeaveType::EmergencyLeave => "Urgent unforeseen circumstances",
            LeaveType::MaternityLeave => "Leave for childbirth and childcare",
            LeaveType::PaternityLeave => "Leave for fathers after childbirth",
            LeaveType::BereavementLeave => "Leave due to death of family member",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_half_day: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
    #[serde(default)]
    pub total_days: Option<f64>,
    #[serde(default)]
    pub days: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub employee: Option<EmployeeLink>,
}

impl LeaveRequest {
    /// Duration as stored by the backend, falling back to the local count.
    pub fn total_days(&self) -> f64 {
        self.total_days
            .or(self.days)
            .unwrap_or_else(|| calculate_days(self.start_date, self.end_date, self.is_half_day))
    }
}

/// Body of `POST /api/leaves`; only built from a validated form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub end_date: NaiveDate,
    pub reason: String,
    pub is_half_day: bool,
}
