//! REST paths of the HR backend, relative to the configured base URL.

use std::fmt::Write;

/// Percent-encodes an id for use as one path segment; only RFC 3986
/// unreserved characters pass through.
pub fn segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

// Auth
pub const LOGIN: &str = "/api/auth/login";
pub const CHANGE_PASSWORD: &str = "/api/auth/change-password";

pub fn reset_password(employee_id: &str) -> String {
    format!("/api/auth/reset-password/{}", segment(employee_id))
}

// Employees
pub const EMPLOYEES: &str = "/api/employees";
pub const MY_PROFILE: &str = "/api/employees/me";
pub const DEPARTMENT_STATS: &str = "/api/employees/departments/stats";

pub fn employee(id: &str) -> String {
    format!("{EMPLOYEES}/{}", segment(id))
}

// Attendance
pub const CLOCK_IN: &str = "/api/attendance/clock-in";
pub const CLOCK_OUT: &str = "/api/attendance/clock-out";
pub const ATTENDANCE_TODAY: &str = "/api/attendance/today";
pub const MY_ATTENDANCE: &str = "/api/attendance/my";
pub const ALL_ATTENDANCE: &str = "/api/attendance/all";

// Leaves
pub const LEAVES: &str = "/api/leaves";
pub const MY_LEAVES: &str = "/api/leaves/my";

pub fn approve_leave(id: &str) -> String {
    format!("{LEAVES}/{}/approve", segment(id))
}

pub fn reject_leave(id: &str) -> String {
    format!("{LEAVES}/{}/reject", segment(id))
}

// Holidays
pub const HOLIDAYS: &str = "/api/holidays";
pub const UPCOMING_HOLIDAYS: &str = "/api/holidays/upcoming";

pub fn holiday(id: &str) -> String {
    format!("{HOLIDAYS}/{}", segment(id))
}

// Payslips
pub const PAYSLIPS: &str = "/api/payslips";
pub const PAYSLIP_UPLOAD: &str = "/api/payslips/upload";

pub fn payslip(id: &str) -> String {
    format!("{PAYSLIPS}/{}", segment(id))
}

pub fn payslip_download(id: &str) -> String {
    format!("{PAYSLIPS}/download/{}", segment(id))
}

// Caller data
pub const CALLS: &str = "/api/calls";
pub const CALLS_TODAY: &str = "/api/calls/today";
pub const MY_CALLS: &str = "/api/calls/my";
pub const ALL_CALLS: &str = "/api/calls/all";
pub const CALL_PERFORMANCE_STATS: &str = "/api/calls/performance/stats";

pub fn call(id: &str) -> String {
    format!("{CALLS}/{}", segment(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterised_paths() {
        assert_eq!(call("abc"), "/api/calls/abc");
        assert_eq!(approve_leave("l1"), "/api/leaves/l1/approve");
        assert_eq!(reject_leave("l1"), "/api/leaves/l1/reject");
        assert_eq!(payslip_download("p9"), "/api/payslips/download/p9");
        assert_eq!(reset_password("e3"), "/api/auth/reset-password/e3");
        assert_eq!(employee("e3"), "/api/employees/e3");
        assert_eq!(holiday("h1"), "/api/holidays/h1");
    }

    #[test]
    fn ids_cannot_escape_their_segment() {
        assert_eq!(call("a/b?c"), "/api/calls/a%2Fb%3Fc");
        assert_eq!(approve_leave("../l1"), "/api/leaves/..%2Fl1/approve");
        assert_eq!(payslip("p 9#x"), "/api/payslips/p%209%23x");
        assert_eq!(segment("65f1a2b3c4d5e6f7a8b9c0d1"), "65f1a2b3c4d5e6f7a8b9c0d1");
        assert_eq!(segment("é"), "%C3%A9");
    }
}
