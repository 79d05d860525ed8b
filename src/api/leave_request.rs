use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::leave::{LeaveBalance, LeaveForm};
use crate::model::leave_request::LeaveRequest;
use crate::models::Ack;
use crate::routes;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaveBody {
    #[serde(default, alias = "leaveRequest")]
    leave: Option<LeaveRequest>,
}

#[derive(Deserialize)]
struct LeaveListBody {
    #[serde(default)]
    leaves: Vec<LeaveRequest>,
}

#[derive(Serialize)]
struct LeaveFilter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl ApiClient {
    /// Validates the form as of `today` and submits it; nothing is sent
    /// while the form has errors.
    #[instrument(skip(self, form), fields(leave_type = ?form.leave_type()))]
    pub async fn submit_leave(
        &self,
        form: &LeaveForm,
        today: NaiveDate,
    ) -> Result<Option<LeaveRequest>> {
        self.session().require_login()?;
        let payload = form.to_request(today).map_err(ClientError::Invalid)?;

        let body: LeaveBody = self.post(routes::LEAVES, &payload).await?;
        info!(days = form.total_days(), "Leave request submitted");
        Ok(body.leave)
    }

    pub async fn my_leaves(&self) -> Result<Vec<LeaveRequest>> {
        self.session().require_login()?;
        let body: LeaveListBody = self.get(routes::MY_LEAVES).await?;
        Ok(body.leaves)
    }

    pub async fn my_leave_balance(&self, year: i32) -> Result<LeaveBalance> {
        let leaves = self.my_leaves().await?;
        Ok(LeaveBalance::from_history(&leaves, year))
    }

    pub async fn list_leaves(
        &self,
        employee: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<LeaveRequest>> {
        self.session().require_admin()?;
        let filter = LeaveFilter { employee, limit };
        let body: LeaveListBody = self.get_with(routes::LEAVES, &filter).await?;
        Ok(body.leaves)
    }

    pub async fn approve_leave(&self, id: &str) -> Result<()> {
        self.session().require_admin()?;
        let request = self.request(Method::PUT, &routes::approve_leave(id));
        self.fetch::<Ack>(request).await?;
        info!(leave_id = id, "Leave approved");
        Ok(())
    }

    pub async fn reject_leave(&self, id: &str) -> Result<()> {
        self.session().require_admin()?;
        let request = self.request(Method::PUT, &routes::reject_leave(id));
        self.fetch::<Ack>(request).await?;
        info!(leave_id = id, "Leave rejected");
        Ok(())
    }
}
