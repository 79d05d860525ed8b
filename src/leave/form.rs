use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::Display;

use crate::leave::duration::{calculate_days, calculate_working_days};
use crate::model::leave_request::{LeaveType, NewLeaveRequest};

pub const MIN_REASON_CHARS: usize = 10;
pub const MAX_REASON_CHARS: usize = 500;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LeaveField {
    Type,
    StartDate,
    EndDate,
    Reason,
}

/// Field name to message; empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<LeaveField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: LeaveField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LeaveField, &String)> {
        self.0.iter()
    }

    /// Later checks overwrite earlier messages on the same field.
    fn set(&mut self, field: LeaveField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Leave request input while it is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
    #[serde(rename = "type")]
    leave_type: Option<LeaveType>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    reason: String,
    is_half_day: bool,
}

impl LeaveForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leave_type(&self) -> Option<LeaveType> {
        self.leave_type
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_half_day(&self) -> bool {
        self.is_half_day
    }

    pub fn set_leave_type(&mut self, leave_type: Option<LeaveType>) {
        self.leave_type = leave_type;
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// A half day follows its start date.
    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        if self.is_half_day {
            self.end_date = date;
        }
    }

    /// Moving the end away from the start turns a half day back into a full leave.
    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.end_date = date;
        if self.is_half_day && date != self.start_date {
            self.is_half_day = false;
        }
    }

    /// A half day always ends on the day it starts.
    pub fn set_half_day(&mut self, half_day: bool) {
        self.is_half_day = half_day;
        if half_day {
            self.end_date = self.start_date;
        }
    }

    /// 0 until both dates are chosen.
    pub fn total_days(&self) -> f64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => calculate_days(start, end, self.is_half_day),
            _ => 0.0,
        }
    }

    pub fn working_days(&self) -> f64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => calculate_working_days(start, end, self.is_half_day),
            _ => 0.0,
        }
    }

    /// Checks the form against leave policy as of `today`.
    pub fn validate(&self, today: NaiveDate) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.leave_type.is_none() {
            errors.set(LeaveField::Type, "Leave type is required");
        }
        if self.start_date.is_none() {
            errors.set(LeaveField::StartDate, "Start date is required");
        }
        if self.end_date.is_none() {
            errors.set(LeaveField::EndDate, "End date is required");
        }

        let reason_len = self.reason.trim().chars().count();
        if reason_len < MIN_REASON_CHARS {
            errors.set(LeaveField::Reason, "Reason must be at least 10 characters long");
        } else if reason_len > MAX_REASON_CHARS {
            errors.set(LeaveField::Reason, "Reason cannot exceed 500 characters");
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start < today {
                errors.set(LeaveField::StartDate, "Start date cannot be in the past");
            }
            if end < start {
                errors.set(LeaveField::EndDate, "End date cannot be before start date");
            }

            let days = self.total_days();
            match self.leave_type {
                Some(LeaveType::Vacation) if days > 7.0 => {
                    errors.set(LeaveField::EndDate, "Vacation leave cannot exceed 7 days")
                }
                Some(LeaveType::SickLeave) if days > 3.0 => {
                    errors.set(LeaveField::EndDate, "Sick leave cannot exceed 3 days")
                }
                _ => {}
            }
        }

        errors
    }

    /// The request body, or the reasons it cannot be sent yet.
    pub fn to_request(&self, today: NaiveDate) -> Result<NewLeaveRequest, ValidationErrors> {
        let errors = self.validate(today);
        match (self.leave_type, self.start_date, self.end_date) {
            (Some(leave_type), Some(start_date), Some(end_date)) if errors.is_empty() => {
                Ok(NewLeaveRequest {
                    leave_type,
                    start_date,
                    end_date,
                    reason: self.reason.trim().to_string(),
                    is_half_day: self.is_half_day,
                })
            }
            _ => Err(errors),
        }
    }
}
