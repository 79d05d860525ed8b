use chrono::{Datelike, NaiveDate};

pub const HALF_DAY: f64 = 0.5;

/// Inclusive calendar days of a leave, never less than one.
pub fn calculate_days(start: NaiveDate, end: NaiveDate, is_half_day: bool) -> f64 {
    if is_half_day {
        return HALF_DAY;
    }
    let span = (end - start).num_days() + 1;
    span.max(1) as f64
}

/// Monday to Friday within the inclusive span.
pub fn calculate_working_days(start: NaiveDate, end: NaiveDate, is_half_day: bool) -> f64 {
    if is_half_day {
        return HALF_DAY;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_working_day(*day))
        .count() as f64
}

pub fn is_working_day(day: NaiveDate) -> bool {
    // 0 = Sunday .. 6 = Saturday
    (1..=5).contains(&day.weekday().num_days_from_sunday())
}
