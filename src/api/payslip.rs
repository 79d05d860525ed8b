use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::payslip::{Payslip, PayslipUpload};
use crate::models::Ack;
use crate::routes;

#[derive(Deserialize)]
struct PayslipListBody {
    #[serde(default)]
    payslips: Vec<Payslip>,
}

#[derive(Deserialize)]
struct PayslipBody {
    #[serde(default)]
    payslip: Option<Payslip>,
}

impl ApiClient {
    /// Admins see every payslip, employees only their own.
    pub async fn payslips(&self) -> Result<Vec<Payslip>> {
        self.session().require_login()?;
        let body: PayslipListBody = self.get(routes::PAYSLIPS).await?;
        Ok(body.payslips)
    }

    pub async fn upload_payslip(&self, upload: PayslipUpload) -> Result<Option<Payslip>> {
        self.session().require_admin()?;
        if !(1..=12).contains(&upload.month) {
            return Err(ClientError::Rejected(format!("Invalid month: {}", upload.month)));
        }

        let part = Part::bytes(upload.bytes).file_name(upload.file_name.clone());
        let form = Form::new()
            .part("payslip", part)
            .text("employeeId", upload.employee_id.clone())
            .text("month", upload.month.to_string())
            .text("year", upload.year.to_string());

        let request = self.request(Method::POST, routes::PAYSLIP_UPLOAD).multipart(form);
        let body = self.fetch::<PayslipBody>(request).await?.data;
        info!(
            employee_id = %upload.employee_id,
            month = upload.month,
            year = upload.year,
            "Payslip uploaded"
        );
        Ok(body.payslip)
    }

    /// Raw file contents.
    pub async fn download_payslip(&self, id: &str) -> Result<Vec<u8>> {
        self.session().require_login()?;
        let response = self
            .send(self.request(Method::GET, &routes::payslip_download(id)))
            .await?;
        let bytes = response.bytes().await?;
        info!(payslip_id = id, size = bytes.len(), "Payslip downloaded");
        Ok(bytes.to_vec())
    }

    pub async fn delete_payslip(&self, id: &str) -> Result<()> {
        self.session().require_admin()?;
        let _: Ack = self.delete(&routes::payslip(id)).await?;
        info!(payslip_id = id, "Payslip deleted");
        Ok(())
    }
}
