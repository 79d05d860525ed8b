use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::attendance::Attendance;
use crate::models::flexible_date;
use crate::routes;

pub const ALREADY_CLOCKED_IN: &str = "ALREADY_CLOCKED_IN";

#[derive(Deserialize)]
struct AttendanceBody {
    #[serde(default)]
    attendance: Option<Attendance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttendanceListBody {
    #[serde(default)]
    attendance_records: Vec<Attendance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyClockedInBody {
    existing_record: Attendance,
}

#[derive(Serialize)]
struct TodayQuery {
    #[serde(with = "flexible_date")]
    date: NaiveDate,
}

#[derive(Serialize)]
struct AttendanceQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

/// Result of a clock-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockIn {
    Recorded(Attendance),
    /// Today already has a record; it may or may not be clocked out yet.
    AlreadyClockedIn(Attendance),
}

fn require_record(body: AttendanceBody) -> Result<Attendance> {
    body.attendance
        .ok_or_else(|| ClientError::Rejected("Attendance record missing from response".into()))
}

impl ApiClient {
    pub async fn clock_in(&self) -> Result<ClockIn> {
        self.session().require_login()?;

        let request = self.request(Method::POST, routes::CLOCK_IN);
        match self.fetch::<AttendanceBody>(request).await {
            Ok(envelope) => {
                info!("Clocked in");
                Ok(ClockIn::Recorded(require_record(envelope.data)?))
            }
            Err(ClientError::Api { status: 400, code: Some(code), body, .. })
                if code == ALREADY_CLOCKED_IN =>
            {
                warn!("Already clocked in today");
                let existing: AlreadyClockedInBody = serde_json::from_value(body)?;
                Ok(ClockIn::AlreadyClockedIn(existing.existing_record))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn clock_out(&self) -> Result<Attendance> {
        self.session().require_login()?;

        let request = self.request(Method::POST, routes::CLOCK_OUT);
        let record = require_record(self.fetch::<AttendanceBody>(request).await?.data)?;
        info!(hours = record.hours(), "Clocked out");
        Ok(record)
    }

    /// `None` when nothing has been recorded for `date` yet.
    pub async fn attendance_on(&self, date: NaiveDate) -> Result<Option<Attendance>> {
        self.session().require_login()?;

        let request = self
            .request(Method::GET, routes::ATTENDANCE_TODAY)
            .query(&TodayQuery { date });
        match self.fetch::<AttendanceBody>(request).await {
            Ok(envelope) => Ok(envelope.data.attendance),
            Err(ClientError::Rejected(_)) | Err(ClientError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn my_attendance(&self, limit: u32) -> Result<Vec<Attendance>> {
        self.session().require_login()?;
        let query = AttendanceQuery { employee: None, limit: Some(limit) };
        let body: AttendanceListBody = self.get_with(routes::MY_ATTENDANCE, &query).await?;
        Ok(body.attendance_records)
    }

    pub async fn all_attendance(
        &self,
        employee: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Attendance>> {
        self.session().require_admin()?;
        let query = AttendanceQuery { employee, limit };
        let body: AttendanceListBody = self.get_with(routes::ALL_ATTENDANCE, &query).await?;
        Ok(body.attendance_records)
    }
}
