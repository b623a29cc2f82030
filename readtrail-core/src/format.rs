//! Formatting helpers shared by the command-line views.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Marker shown when a value is unknown.
pub const MISSING: &str = "—";

/// Format a timestamp in local time, e.g. "Dec 28, 2024 at 4:30 PM".
pub fn format_date(ts: DateTime<Utc>) -> String {
    format_date_in(&ts.with_timezone(&Local))
}

/// Same as [`format_date`] for an already-converted timestamp.
pub fn format_date_in<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%b %-d, %Y at %-I:%M %p").to_string()
}

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// "40%", or the missing marker when the total is unknown.
pub fn format_percent(percent: Option<u8>) -> String {
    match percent {
        Some(p) => format!("{}%", p),
        None => MISSING.to_string(),
    }
}
