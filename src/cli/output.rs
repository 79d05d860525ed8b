use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::model::employee::EmployeeLink;
use crate::scoring::format_score;

/// Prints `value` as pretty JSON when asked to, otherwise runs `text`.
pub fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T),
{
    if json {
        let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
        println!("{rendered}");
    } else {
        text(value);
    }
    Ok(())
}

/// Outcome of a command that has nothing to show but its success.
pub fn done(json: bool, message: &str) -> anyhow::Result<()> {
    emit(json, &acknowledgement(message), |_| println!("{message}"))
}

fn acknowledgement(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": true, "message": message })
}

pub fn time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn who(link: Option<&EmployeeLink>) -> &str {
    link.map(EmployeeLink::display_name).unwrap_or("-")
}

pub fn score(value: f64) -> String {
    format_score(value)
}

pub fn days(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_counts_drop_trailing_zero() {
        assert_eq!(days(3.0), "3");
        assert_eq!(days(0.5), "0.5");
    }

    #[test]
    fn acknowledgements_are_json_objects() {
        let ack = acknowledgement("Leave approved");
        assert_eq!(ack["success"], true);
        assert_eq!(ack["message"], "Leave approved");
    }

    #[test]
    fn missing_times_render_as_dashes() {
        assert_eq!(time(None), "--:--");
        assert_eq!(who(None), "-");
    }
}
