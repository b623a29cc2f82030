//! Reading statistics summary
//!
//! Provides status counts, page totals, recent activity windows and the
//! reading streak, all computed from already-loaded books and entries.

use crate::types::{Book, BookStatus, ProgressEntry};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::HashSet;

/// Days of history the streak walk looks at before giving up.
pub const STREAK_LOOKBACK_DAYS: i64 = 365;

/// Statistics summary shown on the stats view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub total_books: usize,
    pub books_reading: usize,
    pub books_paused: usize,
    pub books_finished: usize,
    /// Sum of current pages across all books
    pub total_pages_read: i64,
    /// Sum of total pages across all books
    pub total_pages_in_library: i64,
    /// Mean progress over books with a known total, 0 when there are none
    pub average_progress: u8,
    pub entries_last_7_days: usize,
    pub entries_last_30_days: usize,
    /// Highest page logged in the last 7 days
    pub highest_page_last_7_days: i64,
    /// Consecutive days with at least one entry, ending today
    pub streak: u32,
}

impl ReadingStats {
    /// Human-readable streak, e.g. "1 day" or "12 days".
    pub fn format_streak(&self) -> String {
        match self.streak {
            1 => "1 day".to_string(),
            n => format!("{} days", n),
        }
    }
}

/// Compute the full summary.
///
/// `now` fixes both the trailing windows and, through its time zone, which
/// calendar day counts as "today" for the streak.
pub fn compute_stats<Tz: TimeZone>(
    books: &[Book],
    entries: &[ProgressEntry],
    now: &DateTime<Tz>,
) -> ReadingStats {
    let count = |status: BookStatus| books.iter().filter(|b| b.status == status).count();

    let week_ago = now.clone() - Duration::days(7);
    let month_ago = now.clone() - Duration::days(30);
    let last_week: Vec<&ProgressEntry> = entries
        .iter()
        .filter(|e| e.created_at >= week_ago)
        .collect();

    ReadingStats {
        total_books: books.len(),
        books_reading: count(BookStatus::Reading),
        books_paused: count(BookStatus::Paused),
        books_finished: count(BookStatus::Finished),
        total_pages_read: books.iter().map(|b| b.current_page).sum(),
        total_pages_in_library: books.iter().map(|b| b.total_pages.max(0)).sum(),
        average_progress: average_progress(books),
        entries_last_7_days: last_week.len(),
        entries_last_30_days: entries.iter().filter(|e| e.created_at >= month_ago).count(),
        highest_page_last_7_days: last_week.iter().map(|e| e.page).max().unwrap_or(0),
        streak: reading_streak(entries, now),
    }
}

/// Mean of clamped per-book percentages, rounded once at the end.
fn average_progress(books: &[Book]) -> u8 {
    let known: Vec<f64> = books
        .iter()
        .filter(|b| b.total_pages > 0)
        .map(|b| (b.current_page as f64 / b.total_pages as f64 * 100.0).clamp(0.0, 100.0))
        .collect();

    if known.is_empty() {
        return 0;
    }
    (known.iter().sum::<f64>() / known.len() as f64).round() as u8
}

/// Count consecutive calendar days, walking back from today, that have at
/// least one entry.
///
/// An empty today is skipped rather than ending the streak; the first empty
/// day after it does.
pub fn reading_streak<Tz: TimeZone>(entries: &[ProgressEntry], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let active_days: HashSet<NaiveDate> = entries
        .iter()
        .map(|e| e.created_at.with_timezone(&tz).date_naive())
        .collect();

    let today = now.date_naive();
    let mut streak = 0;

    for offset in 0..STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}
