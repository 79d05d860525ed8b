use chrono::{Datelike, NaiveDate};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::attendance::Attendance;
use crate::model::call_data::{CallDataInput, CallDataQuery, DailyCallMetric, PerformanceStats};
use crate::models::Ack;
use crate::routes;
use crate::scoring::MonthlySummary;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallDataBody {
    #[serde(default)]
    call_data: Option<DailyCallMetric>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallDataListBody {
    #[serde(default)]
    call_data_records: Vec<DailyCallMetric>,
}

#[derive(Serialize)]
struct Limit {
    limit: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Whether a save created a new day record or changed an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    Created(Option<DailyCallMetric>),
    Updated(Option<DailyCallMetric>),
}

/// Employees cannot touch their caller data once they have clocked out.
pub fn ensure_open_for_edits(today: Option<&Attendance>) -> Result<()> {
    match today {
        Some(record) if record.clock_out.is_some() => Err(ClientError::Forbidden(
            "Cannot change call data after checking out".into(),
        )),
        _ => Ok(()),
    }
}

/// `/api/calls/my` only returns the newest records, so the limit has to
/// reach back to the first day of the requested month.
pub fn history_limit(month: u32, year: i32, today: NaiveDate) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ClientError::Rejected(format!("Invalid month: {year}-{month}")))?;
    let back = (today - first).num_days().max(0);
    Ok(u32::try_from(back + 31).unwrap_or(u32::MAX))
}

impl ApiClient {
    /// The caller's record for today, if one exists.
    pub async fn today_call_data(&self) -> Result<Option<DailyCallMetric>> {
        self.session().require_login()?;
        let request = self.request(Method::GET, routes::CALLS_TODAY);
        match self.fetch::<CallDataBody>(request).await {
            Ok(envelope) => Ok(envelope.data.call_data),
            Err(ClientError::Rejected(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn my_call_data(&self, limit: u32) -> Result<Vec<DailyCallMetric>> {
        self.session().require_login()?;
        let body: CallDataListBody = self.get_with(routes::MY_CALLS, &Limit { limit }).await?;
        Ok(body.call_data_records)
    }

    pub async fn all_call_data(&self, query: &CallDataQuery) -> Result<Vec<DailyCallMetric>> {
        self.session().require_admin()?;
        let body: CallDataListBody = self.get_with(routes::ALL_CALLS, query).await?;
        Ok(body.call_data_records)
    }

    /// At most one record exists per employee and day.
    pub async fn find_call_data(
        &self,
        employee: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyCallMetric>> {
        let query = CallDataQuery {
            employee: Some(employee.to_string()),
            date: Some(date),
            limit: Some(1),
            ..Default::default()
        };
        Ok(self.all_call_data(&query).await?.into_iter().next())
    }

    pub async fn create_call_data(&self, input: &CallDataInput) -> Result<Option<DailyCallMetric>> {
        self.session().require_login()?;
        let body: CallDataBody = self.post(routes::CALLS, input).await?;
        info!(score = input.metrics.score(), "Call data added");
        Ok(body.call_data)
    }

    pub async fn update_call_data(
        &self,
        id: &str,
        input: &CallDataInput,
    ) -> Result<Option<DailyCallMetric>> {
        self.session().require_login()?;
        let body: CallDataBody = self.put(&routes::call(id), &input.for_update()).await?;
        info!(record_id = id, score = input.metrics.score(), "Call data updated");
        Ok(body.call_data)
    }

    pub async fn delete_call_data(&self, id: &str) -> Result<()> {
        self.session().require_login()?;
        let _: Ack = self.delete(&routes::call(id)).await?;
        info!(record_id = id, "Call data deleted");
        Ok(())
    }

    /// Records today's numbers for the logged-in caller, updating today's
    /// record when there already is one.
    pub async fn save_my_call_data(&self, input: &CallDataInput, today: NaiveDate) -> Result<Saved> {
        let attendance = self.attendance_on(today).await?;
        ensure_open_for_edits(attendance.as_ref())?;

        let own = CallDataInput { employee: None, date: None, ..input.clone() };
        match self.today_call_data().await? {
            Some(existing) => Ok(Saved::Updated(self.update_call_data(&existing.id, &own).await?)),
            None => Ok(Saved::Created(self.create_call_data(&own).await?)),
        }
    }

    /// Admin entry for any employee and day; looks the pair up first so the
    /// same day is never inserted twice.
    pub async fn save_call_data_for(
        &self,
        employee: &str,
        date: NaiveDate,
        input: &CallDataInput,
    ) -> Result<Saved> {
        self.session().require_admin()?;

        let input = CallDataInput {
            employee: Some(employee.to_string()),
            date: Some(date),
            ..input.clone()
        };
        match self.find_call_data(employee, date).await? {
            Some(existing) => Ok(Saved::Updated(self.update_call_data(&existing.id, &input).await?)),
            None => Ok(Saved::Created(self.create_call_data(&input).await?)),
        }
    }

    /// Totals for one month; `None` summarises the logged-in caller.
    pub async fn monthly_call_summary(
        &self,
        employee: Option<&str>,
        month: u32,
        year: i32,
        today: NaiveDate,
    ) -> Result<MonthlySummary> {
        let records = match employee {
            Some(employee) => {
                let query = CallDataQuery {
                    employee: Some(employee.to_string()),
                    month: Some(month),
                    year: Some(year),
                    ..Default::default()
                };
                self.all_call_data(&query).await?
            }
            None => self
                .my_call_data(history_limit(month, year, today)?)
                .await?
                .into_iter()
                .filter(|r| r.date.month() == month && r.date.year() == year)
                .collect(),
        };
        Ok(MonthlySummary::from_records(&records))
    }

    pub async fn performance_stats(&self, filter: &StatsFilter) -> Result<PerformanceStats> {
        self.session().require_admin()?;
        self.get_with(routes::CALL_PERFORMANCE_STATS, filter).await
    }
}
