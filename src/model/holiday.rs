use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::models::flexible_date;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum HolidayType {
    #[default]
    Company,
    National,
    Religious,
    Regional,
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub holiday_type: HolidayType,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default = "yes")]
    pub notify_employees: bool,
    #[serde(default = "yes")]
    pub is_office_close: bool,
}

/// Body of holiday create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayInput {
    pub name: String,
    pub description: String,
    #[serde(with = "flexible_date::option")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    pub is_recurring: bool,
    pub notify_employees: bool,
    pub is_office_close: bool,
}

impl Default for HolidayInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            date: None,
            holiday_type: HolidayType::Company,
            is_recurring: false,
            notify_employees: true,
            is_office_close: true,
        }
    }
}

impl HolidayInput {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Holiday name is required");
        }
        if self.date.is_none() {
            return Err("Holiday date is required");
        }
        Ok(())
    }
}

impl From<&Holiday> for HolidayInput {
    fn from(h: &Holiday) -> Self {
        Self {
            name: h.name.clone(),
            description: h.description.clone(),
            date: Some(h.date),
            holiday_type: h.holiday_type,
            is_recurring: h.is_recurring,
            notify_employees: h.notify_employees,
            is_office_close: h.is_office_close,
        }
    }
}
