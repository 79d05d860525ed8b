use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::employee::EmployeeLink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    #[serde(alias = "_id")]
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub month_year: String,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub downloaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub download_count: u32,
    #[serde(default)]
    pub employee: Option<EmployeeLink>,
}

impl Payslip {
    pub fn size_kb(&self) -> u64 {
        (self.file_size as f64 / 1024.0).round() as u64
    }
}

/// Form fields sent alongside the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipUpload {
    pub employee_id: String,
    /// 1..=12
    pub month: u32,
    pub year: i32,
    pub file_name: String,
    pub bytes: Vec<u8>,
}
