use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::holiday::HolidayType;
use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::models::flexible_date;

pub mod commands;
mod output;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(
    name = "hrm-portal",
    about = "Employee and admin portal for the HR backend",
    version
)]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Change your own password
    Password(PasswordArgs),
    /// Today's status, leave balance, upcoming holidays and recent calls
    Dashboard,
    /// Manage employees (admin)
    Employees {
        #[command(subcommand)]
        command: EmployeeCommand,
    },
    /// Clock in, clock out and attendance history
    Attendance {
        #[command(subcommand)]
        command: AttendanceCommand,
    },
    /// Leave requests and approvals
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Company holidays
    Holidays {
        #[command(subcommand)]
        command: HolidayCommand,
    },
    /// Payslip files
    Payslips {
        #[command(subcommand)]
        command: PayslipCommand,
    },
    /// Daily caller data and performance
    Calls {
        #[command(subcommand)]
        command: CallCommand,
    },
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "HRM_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Refuse the login unless the account is an admin
    #[arg(long)]
    pub admin: bool,
}

#[derive(Args, Debug)]
pub struct PasswordArgs {
    #[arg(long)]
    pub current: String,
    #[arg(long)]
    pub new: String,
    #[arg(long)]
    pub confirm: String,
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    List,
    Show { id: String },
    Create(CreateEmployeeArgs),
    Update(UpdateEmployeeArgs),
    Delete { id: String },
    /// Head-count per department
    Departments,
    /// Set a new password for an employee
    ResetPassword {
        id: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateEmployeeArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long)]
    pub employee_id: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub position: String,
    #[arg(long)]
    pub salary: f64,
    /// YYYY-MM-DD, defaults to today
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "employee")]
    pub role: Role,
}

#[derive(Args, Debug)]
pub struct UpdateEmployeeArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub employee_id: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub salary: Option<f64>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub role: Option<Role>,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    ClockIn,
    ClockOut,
    /// Today's record
    Today,
    /// Your recent records
    My {
        #[arg(long, default_value_t = 30)]
        limit: u32,
    },
    /// Everyone's records (admin)
    All {
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Hours logged in a month
    Hours {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LeaveCommand {
    /// List the leave types and their limits
    Types,
    /// Request leave
    Request(LeaveRequestArgs),
    /// Your requests
    My,
    /// Allowance left this year
    Balance {
        #[arg(long)]
        year: Option<i32>,
    },
    /// All requests (admin)
    List {
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Approve { id: String },
    Reject { id: String },
}

#[derive(Args, Debug)]
pub struct LeaveRequestArgs {
    /// e.g. vacation, sick, personal
    #[arg(long = "type")]
    pub leave_type: Option<LeaveType>,
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub reason: String,
    /// Half a day on the start date
    #[arg(long)]
    pub half_day: bool,
    /// Validate and show the day counts without submitting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum HolidayCommand {
    List,
    Upcoming {
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    Add(HolidayArgs),
    Update {
        id: String,
        #[command(flatten)]
        holiday: HolidayArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct HolidayArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long = "type", default_value = "company")]
    pub holiday_type: HolidayType,
    #[arg(long)]
    pub recurring: bool,
    /// Do not notify employees
    #[arg(long)]
    pub silent: bool,
    /// The office stays open
    #[arg(long)]
    pub office_open: bool,
}

#[derive(Subcommand, Debug)]
pub enum PayslipCommand {
    List,
    Upload {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        file: PathBuf,
    },
    Download {
        id: String,
        /// Defaults to `payslip-<id>.pdf`
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CallCommand {
    /// Today's record
    Today,
    /// Your recent records
    My {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Score a set of numbers without saving
    Preview(MetricArgs),
    /// Save today's numbers, or any day's for an employee (admin)
    Save {
        #[command(flatten)]
        metrics: MetricArgs,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long, value_parser = parse_date, requires = "employee")]
        date: Option<NaiveDate>,
    },
    /// Records of all employees (admin)
    All(CallFilterArgs),
    Delete { id: String },
    /// Ranking and totals (admin)
    Stats {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Monthly totals for you, or for an employee (admin)
    Summary {
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
}

/// Counts are read leniently; anything non-numeric counts as 0.
#[derive(Args, Debug)]
pub struct MetricArgs {
    #[arg(long, default_value = "0")]
    pub visited: String,
    #[arg(long, default_value = "0")]
    pub interested: String,
    /// Minutes on the phone
    #[arg(long, default_value = "0")]
    pub call_time: String,
    #[arg(long, default_value = "0")]
    pub calls: String,
}

#[derive(Args, Debug)]
pub struct CallFilterArgs {
    #[arg(long)]
    pub employee: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub month: Option<u32>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    flexible_date::parse(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}
