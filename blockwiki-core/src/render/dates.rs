//! Date mention formatting.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static BARE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Render a date mention's start value.
///
/// A bare `YYYY-MM-DD` becomes a phrase relative to `today`; a date-time keeps
/// its literal time of day: `Mar 5, 2024 – 14:30`.
pub fn format_date(start: &str, today: NaiveDate) -> String {
    if BARE_DATE.is_match(start) {
        return match NaiveDate::parse_from_str(start, "%Y-%m-%d") {
            Ok(date) => relative_day((date - today).num_days()),
            Err(e) => {
                warn!("Invalid date mention {:?}: {}", start, e);
                crate::html::escape_angles(start)
            }
        };
    }

    let Some(date) = start
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    else {
        warn!("Unrecognized date mention {:?}", start);
        return crate::html::escape_angles(start);
    };

    let long_date = date.format("%b %-d, %Y");
    match start.get(11..16) {
        Some(time) => format!("{} – {}", long_date, time),
        None => long_date.to_string(),
    }
}

/// Capitalised day offset: "Today", "In 3 days", "5 days ago"
pub fn relative_day(delta: i64) -> String {
    match delta {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        n if n > 1 => format!("In {} days", n),
        n => format!("{} days ago", -n),
    }
}
