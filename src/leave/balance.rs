use chrono::Datelike;
use serde::Serialize;

use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Paid leave days granted per calendar year.
pub const ANNUAL_LEAVE_ALLOWANCE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaveBalance {
    pub total: f64,
    pub used: f64,
    pub remaining: f64,
}

impl LeaveBalance {
    /// Approved leaves starting in `year` count against the allowance.
    pub fn from_history(leaves: &[LeaveRequest], year: i32) -> Self {
        let used: f64 = leaves
            .iter()
            .filter(|l| l.status == LeaveStatus::Approved && l.start_date.year() == year)
            .map(LeaveRequest::total_days)
            .sum();

        Self {
            total: ANNUAL_LEAVE_ALLOWANCE,
            used,
            remaining: (ANNUAL_LEAVE_ALLOWANCE - used).max(0.0),
        }
    }
}

impl Default for LeaveBalance {
    fn default() -> Self {
        Self {
            total: ANNUAL_LEAVE_ALLOWANCE,
            used: 0.0,
            remaining: ANNUAL_LEAVE_ALLOWANCE,
        }
    }
}
