use anyhow::{Context, bail};
use chrono::{Datelike, Local, NaiveDate};
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::api::attendance::ClockIn;
use crate::api::call_data::{Saved, StatsFilter};
use crate::cli::output::{self, emit};
use crate::cli::{
    AttendanceCommand, CallCommand, CallFilterArgs, Cli, Command, CreateEmployeeArgs,
    EmployeeCommand, HolidayArgs, HolidayCommand, LeaveCommand, LeaveRequestArgs, MetricArgs,
    PayslipCommand, UpdateEmployeeArgs,
};
use crate::error::ClientError;
use crate::leave::LeaveForm;
use crate::model::attendance::{TodayStatus, monthly_hours};
use crate::model::call_data::{CallDataInput, CallDataQuery, CallMetrics, DailyCallMetric};
use crate::model::employee::{CreateEmployee, UpdateEmployee, department_share};
use crate::model::holiday::{Holiday, HolidayInput};
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::payslip::PayslipUpload;
use crate::scoring::parse_metric;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Dispatches one parsed command line.
pub async fn run(cli: Cli, client: &ApiClient) -> anyhow::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Login(args) => {
            let session = if args.admin {
                client.login_admin(&args.email, &args.password).await
            } else {
                client.login(&args.email, &args.password).await
            }
            .context("login failed")?;
            emit(json, &session.employee, |e| {
                println!("Welcome, {} ({})", e.name, e.role)
            })
        }
        Command::Logout => {
            client.logout();
            emit(json, &serde_json::json!({ "loggedOut": true }), |_| {
                println!("Logged out")
            })
        }
        Command::Whoami => {
            let session = client.session().require_login()?;
            emit(json, &session.employee, |e| {
                println!("{} <{}>", e.name, e.email);
                println!("  role:       {}", e.role);
                println!("  department: {}", e.department.as_deref().unwrap_or("-"));
                println!("  position:   {}", e.position.as_deref().unwrap_or("-"));
            })
        }
        Command::Password(args) => {
            client
                .change_password(&args.current, &args.new, &args.confirm)
                .await
                .context("failed to change password")?;
            output::done(json, "Password changed successfully!")
        }
        Command::Dashboard => dashboard(client, json).await,
        Command::Employees { command } => employees(client, command, json).await,
        Command::Attendance { command } => attendance(client, command, json).await,
        Command::Leave { command } => leave(client, command, json).await,
        Command::Holidays { command } => holidays(client, command, json).await,
        Command::Payslips { command } => payslips(client, command, json).await,
        Command::Calls { command } => calls(client, command, json).await,
    }
}

/// Fires every panel's fetch at once and renders whatever came back.
async fn dashboard(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let session = client.session().require_login()?;
    let today = today();

    let (attendance, balance, holidays, calls) = futures::join!(
        client.attendance_on(today),
        client.my_leave_balance(today.year()),
        client.upcoming_holidays(3),
        client.my_call_data(5),
    );

    // A 401 on any panel means the session is gone; nothing else is worth showing.
    for err in [
        attendance.as_ref().err(),
        balance.as_ref().err(),
        holidays.as_ref().err(),
        calls.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        if matches!(err, ClientError::Unauthorized) {
            bail!(ClientError::Unauthorized);
        }
        warn!(error = %err, "Dashboard panel failed to load");
    }

    let status = attendance.as_ref().ok().map(|a| TodayStatus::from_record(a.as_ref()));
    let view = serde_json::json!({
        "employee": &session.employee,
        "today": status,
        "leaveBalance": balance.as_ref().ok(),
        "upcomingHolidays": holidays.as_ref().ok(),
        "recentCalls": calls.as_ref().ok(),
    });

    emit(json, &view, |_| {
        println!("Hello, {}  ({})", session.employee.name, today.format("%A, %d %B %Y"));

        match &status {
            Some(s) if s.clocked_out => println!(
                "Attendance: {} - {} ({:.2} h)",
                output::time(s.clock_in_time),
                output::time(s.clock_out_time),
                s.total_hours
            ),
            Some(s) if s.clocked_in => {
                println!("Attendance: clocked in at {}", output::time(s.clock_in_time))
            }
            Some(_) => println!("Attendance: not clocked in"),
            None => println!("Attendance: unavailable"),
        }

        match balance.as_ref() {
            Ok(b) => println!(
                "Leave: {} of {} days left ({} used)",
                output::days(b.remaining),
                output::days(b.total),
                output::days(b.used)
            ),
            Err(_) => println!("Leave: unavailable"),
        }

        match holidays.as_ref() {
            Ok(list) if list.is_empty() => println!("Holidays: none coming up"),
            Ok(list) => {
                println!("Holidays:");
                for h in list {
                    println!("  {}  {} ({})", h.date, h.name, h.holiday_type);
                }
            }
            Err(_) => println!("Holidays: unavailable"),
        }

        match calls.as_ref() {
            Ok(list) if list.is_empty() => println!("Calls: nothing recorded yet"),
            Ok(list) => {
                println!("Calls:");
                for r in list {
                    println!(
                        "  {}  {} calls, {} min, score {}",
                        r.date,
                        r.metrics.total_calls,
                        r.metrics.total_call_time,
                        output::score(r.score())
                    );
                }
            }
            Err(_) => println!("Calls: unavailable"),
        }
    })
}

async fn employees(client: &ApiClient, command: EmployeeCommand, json: bool) -> anyhow::Result<()> {
    match command {
        EmployeeCommand::List => {
            let list = client.list_employees().await?;
            emit(json, &list, |list| {
                for e in list {
                    println!(
                        "{:<26} {:<10} {:<24} {:<14} {}",
                        e.id,
                        e.employee_id.as_deref().unwrap_or("-"),
                        e.name,
                        e.department.as_deref().unwrap_or("-"),
                        e.role
                    );
                }
            })
        }
        EmployeeCommand::Show { id } => {
            let e = client.get_employee(&id).await?;
            emit(json, &e, |e| {
                println!("{} <{}>", e.name, e.email);
                println!("  employee id: {}", e.employee_id.as_deref().unwrap_or("-"));
                println!("  department:  {}", e.department.as_deref().unwrap_or("-"));
                println!("  position:    {}", e.position.as_deref().unwrap_or("-"));
                println!("  phone:       {}", e.phone.as_deref().unwrap_or("-"));
                if let Some(start) = e.start_date {
                    println!("  started:     {start}");
                }
                println!("  status:      {}", e.status.as_deref().unwrap_or("-"));
            })
        }
        EmployeeCommand::Create(args) => {
            let created = client
                .create_employee(&create_payload(args))
                .await
                .context("failed to add employee")?;
            emit(json, &created, |_| println!("Employee added successfully!"))
        }
        EmployeeCommand::Update(args) => {
            let id = args.id.clone();
            let updated = client
                .update_employee(&id, &update_payload(args))
                .await
                .context("failed to update employee")?;
            emit(json, &updated, |_| println!("Employee updated"))
        }
        EmployeeCommand::Delete { id } => {
            client.delete_employee(&id).await?;
            output::done(json, "Employee deleted")
        }
        EmployeeCommand::Departments => {
            let stats = client.department_stats().await?;
            let total: u64 = stats.iter().map(|s| s.count).sum();
            emit(json, &stats, |stats| {
                for s in stats {
                    println!(
                        "{:<20} {:>4}  {:>3}%",
                        s.department,
                        s.count,
                        department_share(s, total)
                    );
                }
                println!("{:<20} {:>4}", "total", total);
            })
        }
        EmployeeCommand::ResetPassword { id, new, confirm } => {
            client
                .reset_password(&id, &new, &confirm)
                .await
                .context("failed to reset password")?;
            output::done(json, "Password reset successfully!")
        }
    }
}

fn create_payload(args: CreateEmployeeArgs) -> CreateEmployee {
    CreateEmployee {
        name: args.name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        employee_id: args.employee_id,
        department: args.department,
        position: args.position,
        salary: args.salary,
        start_date: args.start_date.unwrap_or_else(today),
        phone: args.phone,
        role: args.role,
        ..Default::default()
    }
}

fn update_payload(args: UpdateEmployeeArgs) -> UpdateEmployee {
    UpdateEmployee {
        name: args.name,
        email: args.email,
        employee_id: args.employee_id,
        department: args.department,
        position: args.position,
        salary: args.salary,
        phone: args.phone,
        role: args.role,
        status: args.status,
    }
}

async fn attendance(
    client: &ApiClient,
    command: AttendanceCommand,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        AttendanceCommand::ClockIn => match client.clock_in().await? {
            ClockIn::Recorded(record) => emit(json, &record, |r| {
                println!("Clocked in at {}", output::time(r.clock_in))
            }),
            ClockIn::AlreadyClockedIn(record) => emit(json, &record, |r| {
                println!("Already clocked in today at {}", output::time(r.clock_in));
                if r.can_clock_out.unwrap_or(r.clock_out.is_none()) {
                    println!("You can still clock out.");
                }
            }),
        },
        AttendanceCommand::ClockOut => {
            let record = client.clock_out().await?;
            emit(json, &record, |r| {
                println!(
                    "Clocked out at {} ({:.2} h today)",
                    output::time(r.clock_out),
                    r.hours()
                )
            })
        }
        AttendanceCommand::Today => {
            let record = client.attendance_on(today()).await?;
            let status = TodayStatus::from_record(record.as_ref());
            emit(json, &status, |s| {
                println!("Status:    {}", s.status);
                println!("Clock in:  {}", output::time(s.clock_in_time));
                println!("Clock out: {}", output::time(s.clock_out_time));
                println!("Hours:     {:.2}", s.total_hours);
            })
        }
        AttendanceCommand::My { limit } => {
            let records = client.my_attendance(limit).await?;
            emit(json, &records, |records| {
                for r in records {
                    println!(
                        "{}  {} - {}  {:>5.2} h  {}",
                        r.date,
                        output::time(r.clock_in),
                        output::time(r.clock_out),
                        r.hours(),
                        r.status.as_deref().unwrap_or("")
                    );
                }
            })
        }
        AttendanceCommand::All { employee, limit } => {
            let records = client.all_attendance(employee.as_deref(), limit).await?;
            emit(json, &records, |records| {
                for r in records {
                    println!(
                        "{}  {:<24} {} - {}  {:>5.2} h",
                        r.date,
                        output::who(r.employee.as_ref()),
                        output::time(r.clock_in),
                        output::time(r.clock_out),
                        r.hours()
                    );
                }
            })
        }
        AttendanceCommand::Hours { month, year } => {
            let today = today();
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            let records = client.my_attendance(31).await?;
            let hours = monthly_hours(&records, year, month);
            emit(
                json,
                &serde_json::json!({ "month": month, "year": year, "hours": hours }),
                |_| println!("{year}-{month:02}: {hours:.2} h"),
            )
        }
    }
}

/// Applies the arguments in the order a user fills the form, so that the
/// half-day toggle pins the end date to the start date.
fn leave_form(args: &LeaveRequestArgs) -> LeaveForm {
    let mut form = LeaveForm::new();
    form.set_leave_type(args.leave_type);
    form.set_start_date(args.start);
    if let Some(end) = args.end {
        form.set_end_date(Some(end));
    }
    form.set_half_day(args.half_day);
    form.set_reason(args.reason.as_str());
    form
}

async fn leave(client: &ApiClient, command: LeaveCommand, json: bool) -> anyhow::Result<()> {
    match command {
        LeaveCommand::Types => {
            let types: Vec<_> = LeaveType::iter()
                .map(|t| {
                    serde_json::json!({
                        "type": t,
                        "maxDays": t.max_days(),
                        "description": t.description(),
                    })
                })
                .collect();
            emit(json, &types, |_| {
                for t in LeaveType::iter() {
                    let limit = t
                        .max_days()
                        .map(|d| format!("max {} days", output::days(d)))
                        .unwrap_or_default();
                    println!("{:<18} {:<12} {}", t.to_string(), limit, t.description());
                }
            })
        }
        LeaveCommand::Request(args) => {
            let form = leave_form(&args);
            let today = today();

            let errors = form.validate(today);
            if !errors.is_empty() {
                bail!(ClientError::Invalid(errors));
            }

            let preview = serde_json::json!({
                "totalDays": form.total_days(),
                "workingDays": form.working_days(),
            });
            let print_preview = || {
                println!(
                    "{} day(s), {} working day(s)",
                    output::days(form.total_days()),
                    output::days(form.working_days())
                )
            };
            if args.dry_run {
                return emit(json, &preview, |_| print_preview());
            }

            let created = client
                .submit_leave(&form, today)
                .await
                .context("failed to submit leave request")?;
            info!("Leave request submitted from the command line");
            let view = serde_json::json!({ "preview": preview, "leave": created });
            emit(json, &view, |_| {
                print_preview();
                println!("Leave request submitted successfully!")
            })
        }
        LeaveCommand::My => {
            let leaves = client.my_leaves().await?;
            emit(json, &leaves, |l| print_leaves(l))
        }
        LeaveCommand::Balance { year } => {
            let balance = client
                .my_leave_balance(year.unwrap_or_else(|| today().year()))
                .await?;
            emit(json, &balance, |b| {
                println!(
                    "{} of {} days left ({} used)",
                    output::days(b.remaining),
                    output::days(b.total),
                    output::days(b.used)
                )
            })
        }
        LeaveCommand::List { employee, limit } => {
            let leaves = client.list_leaves(employee.as_deref(), limit).await?;
            emit(json, &leaves, |l| print_leaves(l))
        }
        LeaveCommand::Approve { id } => {
            client.approve_leave(&id).await?;
            output::done(json, "Leave approved")
        }
        LeaveCommand::Reject { id } => {
            client.reject_leave(&id).await?;
            output::done(json, "Leave rejected")
        }
    }
}

fn print_leaves(leaves: &[LeaveRequest]) {
    for l in leaves {
        println!(
            "{:<26} {:<24} {:<18} {} .. {}  {:>4}  {}",
            l.id,
            output::who(l.employee.as_ref()),
            l.leave_type.to_string(),
            l.start_date,
            l.end_date,
            output::days(l.total_days()),
            l.status
        );
    }
}

fn holiday_input(args: HolidayArgs) -> HolidayInput {
    HolidayInput {
        name: args.name,
        description: args.description,
        date: Some(args.date),
        holiday_type: args.holiday_type,
        is_recurring: args.recurring,
        notify_employees: !args.silent,
        is_office_close: !args.office_open,
    }
}

async fn holidays(client: &ApiClient, command: HolidayCommand, json: bool) -> anyhow::Result<()> {
    match command {
        HolidayCommand::List => {
            let list = client.holidays().await?;
            emit(json, &list, |l| print_holidays(l))
        }
        HolidayCommand::Upcoming { limit } => {
            let list = client.upcoming_holidays(limit).await?;
            emit(json, &list, |l| print_holidays(l))
        }
        HolidayCommand::Add(args) => {
            let created = client.create_holiday(&holiday_input(args)).await?;
            emit(json, &created, |_| println!("Holiday created"))
        }
        HolidayCommand::Update { id, holiday } => {
            let updated = client.update_holiday(&id, &holiday_input(holiday)).await?;
            emit(json, &updated, |_| println!("Holiday updated"))
        }
        HolidayCommand::Delete { id } => {
            client.delete_holiday(&id).await?;
            output::done(json, "Holiday deleted")
        }
    }
}

fn print_holidays(list: &[Holiday]) {
    for h in list {
        let closed = if h.is_office_close { "office closed" } else { "office open" };
        println!("{}  {:<28} {:<10} {}", h.date, h.name, h.holiday_type, closed);
    }
}

async fn payslips(client: &ApiClient, command: PayslipCommand, json: bool) -> anyhow::Result<()> {
    match command {
        PayslipCommand::List => {
            let list = client.payslips().await?;
            emit(json, &list, |list| {
                for p in list {
                    println!(
                        "{:<26} {:<16} {:<28} {:>5} KB  {} downloads",
                        p.id,
                        p.month_year,
                        p.file_name,
                        p.size_kb(),
                        p.download_count
                    );
                }
            })
        }
        PayslipCommand::Upload { employee, month, year, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "payslip.pdf".to_string());

            let upload = PayslipUpload { employee_id: employee, month, year, file_name, bytes };
            let created = client.upload_payslip(upload).await?;
            emit(json, &created, |_| println!("Payslip uploaded"))
        }
        PayslipCommand::Download { id, out } => {
            let bytes = client.download_payslip(&id).await?;
            let out = out.unwrap_or_else(|| format!("payslip-{id}.pdf").into());
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            let saved = serde_json::json!({ "file": out, "bytes": bytes.len() });
            emit(json, &saved, |_| {
                println!("Saved {} ({} bytes)", out.display(), bytes.len())
            })
        }
        PayslipCommand::Delete { id } => {
            client.delete_payslip(&id).await?;
            output::done(json, "Payslip deleted")
        }
    }
}

fn metrics(args: &MetricArgs) -> CallMetrics {
    CallMetrics {
        visited_today: parse_metric(&args.visited),
        interested_students: parse_metric(&args.interested),
        total_call_time: parse_metric(&args.call_time),
        total_calls: parse_metric(&args.calls),
    }
}

fn call_query(args: CallFilterArgs) -> CallDataQuery {
    CallDataQuery {
        employee: args.employee,
        date: args.date,
        month: args.month,
        year: args.year,
        department: args.department,
        limit: args.limit,
    }
}

async fn calls(client: &ApiClient, command: CallCommand, json: bool) -> anyhow::Result<()> {
    match command {
        CallCommand::Today => {
            let record = client.today_call_data().await?;
            emit(json, &record, |r| match r {
                Some(r) => println!(
                    "{} visited, {} interested, {} min, {} calls: score {}",
                    r.metrics.visited_today,
                    r.metrics.interested_students,
                    r.metrics.total_call_time,
                    r.metrics.total_calls,
                    output::score(r.score())
                ),
                None => println!("No call data for today yet"),
            })
        }
        CallCommand::My { limit } => {
            let records = client.my_call_data(limit).await?;
            emit(json, &records, |r| print_calls(r))
        }
        CallCommand::Preview(args) => {
            let m = metrics(&args);
            emit(
                json,
                &serde_json::json!({ "metrics": m, "performanceScore": m.score() }),
                |_| println!("Performance score: {}", output::score(m.score())),
            )
        }
        CallCommand::Save { metrics: args, notes, employee, date } => {
            let input = CallDataInput {
                metrics: metrics(&args),
                notes,
                ..Default::default()
            };
            let saved = match employee {
                Some(employee) => {
                    client
                        .save_call_data_for(&employee, date.unwrap_or_else(today), &input)
                        .await?
                }
                None => client.save_my_call_data(&input, today()).await?,
            };
            let (verb, record) = match saved {
                Saved::Created(r) => ("added", r),
                Saved::Updated(r) => ("updated", r),
            };
            emit(json, &record, |_| {
                println!(
                    "Call data {verb} (score {})",
                    output::score(input.metrics.score())
                )
            })
        }
        CallCommand::All(args) => {
            let records = client.all_call_data(&call_query(args)).await?;
            emit(json, &records, |r| print_calls(r))
        }
        CallCommand::Delete { id } => {
            client.delete_call_data(&id).await?;
            output::done(json, "Call data deleted")
        }
        CallCommand::Stats { month, year, department } => {
            let filter = StatsFilter { month, year, department };
            let stats = client.performance_stats(&filter).await?;
            emit(json, &stats, |stats| {
                if let Some(top) = &stats.top_performer {
                    println!(
                        "Top performer: {} ({})",
                        top.employee.as_ref().map(|e| e.name.as_str()).unwrap_or("-"),
                        output::score(top.performance_score)
                    );
                }
                for (rank, p) in stats.performance_data.iter().enumerate() {
                    println!(
                        "{:>3}. {:<24} {:>8}  {} days, {} calls, {} min",
                        rank + 1,
                        p.employee.as_ref().map(|e| e.name.as_str()).unwrap_or("-"),
                        output::score(p.performance_score),
                        p.record_count,
                        p.total_calls,
                        p.total_call_time
                    );
                }
                if let Some(overall) = &stats.overall_stats {
                    println!(
                        "{} employees tracked, average score {}",
                        overall.total_employees_tracked,
                        output::score(overall.average_performance_score)
                    );
                }
            })
        }
        CallCommand::Summary { employee, month, year } => {
            let today = today();
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            let summary = client
                .monthly_call_summary(employee.as_deref(), month, year, today)
                .await?;
            emit(json, &summary, |s| {
                println!("{year}-{month:02}: {} days tracked", s.total_days_tracked);
                println!("  visited:    {}", s.total_visited);
                println!("  interested: {}", s.total_interested_students);
                println!("  call time:  {} min", s.total_call_time);
                println!("  calls:      {}", s.total_calls);
                println!(
                    "  score:      {} total, {} average",
                    output::score(s.total_performance_score),
                    output::score(s.average_performance_score)
                );
            })
        }
    }
}

fn print_calls(records: &[DailyCallMetric]) {
    for r in records {
        println!(
            "{}  {:<24} {:>3} visited {:>3} interested {:>4} min {:>4} calls  {:>7}",
            r.date,
            output::who(r.employee.as_ref()),
            r.metrics.visited_today,
            r.metrics.interested_students,
            r.metrics.total_call_time,
            r.metrics.total_calls,
            output::score(r.score())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_args(start: &str, end: Option<&str>, half_day: bool) -> LeaveRequestArgs {
        LeaveRequestArgs {
            leave_type: Some(LeaveType::Vacation),
            start: NaiveDate::parse_from_str(start, "%Y-%m-%d").ok(),
            end: end.and_then(|e| NaiveDate::parse_from_str(e, "%Y-%m-%d").ok()),
            reason: "family trip to the coast".into(),
            half_day,
            dry_run: true,
        }
    }

    #[test]
    fn half_day_flag_pins_end_to_start() {
        let form = leave_form(&request_args("2024-03-04", Some("2024-03-06"), true));
        assert!(form.is_half_day());
        assert_eq!(form.end_date(), form.start_date());
        assert_eq!(form.total_days(), 0.5);
    }

    #[test]
    fn full_days_keep_the_requested_range() {
        let form = leave_form(&request_args("2024-03-04", Some("2024-03-06"), false));
        assert_eq!(form.total_days(), 3.0);
    }

    #[test]
    fn lenient_metric_arguments() {
        let args = MetricArgs {
            visited: "2".into(),
            interested: "abc".into(),
            call_time: "45min".into(),
            calls: "".into(),
        };
        let m = metrics(&args);
        assert_eq!(
            m,
            CallMetrics {
                visited_today: 2,
                interested_students: 0,
                total_call_time: 45,
                total_calls: 0,
            }
        );
        assert!((m.score() - 89.0).abs() < 1e-9);
    }
}
