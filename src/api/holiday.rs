use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::holiday::{Holiday, HolidayInput};
use crate::models::Ack;
use crate::routes;

#[derive(Deserialize)]
struct HolidayListBody {
    #[serde(default)]
    holidays: Vec<Holiday>,
}

#[derive(Deserialize)]
struct HolidayBody {
    #[serde(default)]
    holiday: Option<Holiday>,
}

#[derive(Serialize)]
struct Limit {
    limit: u32,
}

impl ApiClient {
    pub async fn holidays(&self) -> Result<Vec<Holiday>> {
        self.session().require_login()?;
        let body: HolidayListBody = self.get(routes::HOLIDAYS).await?;
        Ok(body.holidays)
    }

    pub async fn upcoming_holidays(&self, limit: u32) -> Result<Vec<Holiday>> {
        self.session().require_login()?;
        let body: HolidayListBody = self
            .get_with(routes::UPCOMING_HOLIDAYS, &Limit { limit })
            .await?;
        Ok(body.holidays)
    }

    pub async fn create_holiday(&self, input: &HolidayInput) -> Result<Option<Holiday>> {
        self.session().require_admin()?;
        input
            .validate()
            .map_err(|msg| ClientError::Rejected(msg.to_string()))?;

        let body: HolidayBody = self.post(routes::HOLIDAYS, input).await?;
        info!(name = %input.name, "Holiday created");
        Ok(body.holiday)
    }

    pub async fn update_holiday(&self, id: &str, input: &HolidayInput) -> Result<Option<Holiday>> {
        self.session().require_admin()?;
        input
            .validate()
            .map_err(|msg| ClientError::Rejected(msg.to_string()))?;

        let body: HolidayBody = self.put(&routes::holiday(id), input).await?;
        info!(holiday_id = id, "Holiday updated");
        Ok(body.holiday)
    }

    pub async fn delete_holiday(&self, id: &str) -> Result<()> {
        self.session().require_admin()?;
        let _: Ack = self.delete(&routes::holiday(id)).await?;
        info!(holiday_id = id, "Holiday deleted");
        Ok(())
    }
}
