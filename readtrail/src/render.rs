//! Plain-text rendering for command output.

use chrono::{DateTime, Utc};
use readtrail_core::analytics::ReadingStats;
use readtrail_core::format::{format_date, format_percent, format_relative_time};
use readtrail_core::{Book, ProgressEntry};

/// Maximum title width in the list view before truncating.
const TITLE_WIDTH: usize = 32;

/// "40 / 100 pages", or just the current page when the total is unknown.
pub fn pages(book: &Book) -> String {
    if book.total_pages > 0 {
        format!("{} / {} pages", book.current_page, book.total_pages)
    } else {
        format!("page {}", book.current_page)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// One line per book for the library list.
pub fn book_row(book: &Book, now: DateTime<Utc>) -> String {
    let title = truncate(&book.title, TITLE_WIDTH);
    let author = if book.author.is_empty() {
        String::new()
    } else {
        format!(" by {}", book.author)
    };

    format!(
        "{:<8} {:>4}  {}{}  ({}, updated {})  [{}]",
        book.status.as_str(),
        format_percent(book.progress_percent()),
        title,
        author,
        pages(book),
        format_relative_time(book.updated_at, now),
        book.id,
    )
}

/// Full detail block for a single book and its history.
pub fn book_detail(book: &Book, history: &[ProgressEntry], now: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", book.title));
    if !book.author.is_empty() {
        out.push_str(&format!("by {}\n", book.author));
    }
    out.push('\n');
    out.push_str(&format!("  ID:        {}\n", book.id));
    out.push_str(&format!("  Status:    {}\n", book.status));
    out.push_str(&format!(
        "  Progress:  {} ({})\n",
        pages(book),
        format_percent(book.progress_percent())
    ));
    out.push_str(&format!("  Added:     {}\n", format_date(book.created_at)));
    out.push_str(&format!("  Updated:   {}\n", format_date(book.updated_at)));
    out.push('\n');

    if history.is_empty() {
        out.push_str("No progress logged yet.\n");
        return out;
    }

    out.push_str(&format!("History ({} entries)\n", history.len()));
    for entry in history {
        out.push_str(&format!(
            "  {:>9}  page {}",
            format_relative_time(entry.created_at, now),
            entry.page
        ));
        if !entry.note.is_empty() {
            out.push_str(&format!("  \"{}\"", entry.note));
        }
        out.push_str(&format!("  [{}]\n", entry.id));
    }
    out
}

/// Stats summary as shown by `readtrail stats`.
pub fn stats(stats: &ReadingStats) -> String {
    let rows = [
        ("Books", stats.total_books.to_string()),
        ("  Reading", stats.books_reading.to_string()),
        ("  Paused", stats.books_paused.to_string()),
        ("  Finished", stats.books_finished.to_string()),
        ("Pages read", stats.total_pages_read.to_string()),
        ("Pages in library", stats.total_pages_in_library.to_string()),
        ("Average progress", format!("{}%", stats.average_progress)),
        ("Entries (7 days)", stats.entries_last_7_days.to_string()),
        ("Entries (30 days)", stats.entries_last_30_days.to_string()),
        ("Reading streak", stats.format_streak()),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<18} {}\n", label, value))
        .collect()
}
