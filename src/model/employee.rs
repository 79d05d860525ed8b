use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::role::Role;
use crate::models::flexible_date;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Employee profile as returned by `/api/employees*` and at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Company employee code, e.g. `EMP-001`
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default, with = "flexible_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
}

/// Partially populated employee embedded in other records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub employee_id: Option<String>,
    pub department: Option<String>,
}

/// Records reference their employee either by id or as a populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeLink {
    Id(String),
    Populated(EmployeeSummary),
}

impl EmployeeLink {
    pub fn id(&self) -> &str {
        match self {
            EmployeeLink::Id(id) => id,
            EmployeeLink::Populated(e) => &e.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            EmployeeLink::Populated(e) if !e.name.is_empty() => &e.name,
            _ => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub employee_id: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    pub phone: String,
    pub role: Role,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
}

impl CreateEmployee {
    /// First problem found, in form order.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Name is required");
        }
        if self.email.trim().is_empty() {
            return Err("Email is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match");
        }
        if self.department.trim().is_empty() {
            return Err("Department is required");
        }
        if self.position.trim().is_empty() {
            return Err("Position is required");
        }
        if !(self.salary > 0.0) {
            return Err("Valid salary is required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateEmployee {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.employee_id.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }
}

/// Head-count per department from `/api/employees/departments/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentStat {
    #[serde(rename = "_id")]
    pub department: String,
    pub count: u64,
}

/// Share of the total head-count, rounded to whole percent.
pub fn department_share(stat: &DepartmentStat, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((stat.count as f64 / total as f64) * 100.0).round() as u64
}
