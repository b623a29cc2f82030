//! Library views: filtering, searching and sorting loaded books.

use crate::types::{Book, BookStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Status filter for the library list. `All` keeps every book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Reading,
    Paused,
    Finished,
}

impl StatusFilter {
    pub fn matches(&self, status: BookStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Reading => status == BookStatus::Reading,
            StatusFilter::Paused => status == BookStatus::Paused,
            StatusFilter::Finished => status == BookStatus::Finished,
        }
    }
}

impl From<BookStatus> for StatusFilter {
    fn from(status: BookStatus) -> Self {
        match status {
            BookStatus::Reading => StatusFilter::Reading,
            BookStatus::Paused => StatusFilter::Paused,
            BookStatus::Finished => StatusFilter::Finished,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other
                .parse::<BookStatus>()
                .map(StatusFilter::from)
                .map_err(|_| format!("unknown status filter: {}", s)),
        }
    }
}

/// Sort order for the library list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recently updated first
    #[default]
    Recent,
    Title,
    Author,
    /// Highest percentage read first
    Progress,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(SortMode::Recent),
            "title" => Ok(SortMode::Title),
            "author" => Ok(SortMode::Author),
            "progress" => Ok(SortMode::Progress),
            _ => Err(format!("unknown sort mode: {}", s)),
        }
    }
}

/// Percentage of the book read, rounded and clamped to 0..=100.
///
/// `None` when the total page count is unknown (zero or negative).
pub fn progress_percent(current_page: i64, total_pages: i64) -> Option<u8> {
    if total_pages <= 0 {
        return None;
    }
    let pct = (current_page as f64 / total_pages as f64 * 100.0).clamp(0.0, 100.0);
    Some(pct.round() as u8)
}

/// Unrounded progress used for ranking; unknown totals rank as 0.
fn progress_ratio(book: &Book) -> f64 {
    if book.total_pages <= 0 {
        0.0
    } else {
        book.current_page as f64 / book.total_pages as f64
    }
}

/// Keep books whose status matches `filter`.
pub fn filter_by_status<'a>(books: &'a [Book], filter: StatusFilter) -> Vec<&'a Book> {
    books.iter().filter(|b| filter.matches(b.status)).collect()
}

/// Case-insensitive substring match against title or author.
///
/// A whitespace-only query matches everything; any other query is used
/// as typed, surrounding spaces included.
pub fn matches_query(book: &Book, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

/// Keep books matching `query`; an empty query keeps everything.
pub fn search<'a>(books: &[&'a Book], query: &str) -> Vec<&'a Book> {
    books
        .iter()
        .copied()
        .filter(|b| matches_query(b, query))
        .collect()
}

/// Compare display strings: case-insensitive first, exact text breaks ties.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort in place. The sort is stable, so equal keys keep their input order.
pub fn sort_books(books: &mut [&Book], mode: SortMode) {
    match mode {
        SortMode::Recent => books.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortMode::Title => books.sort_by(|a, b| compare_text(&a.title, &b.title)),
        SortMode::Author => books.sort_by(|a, b| compare_text(&a.author, &b.author)),
        SortMode::Progress => books.sort_by(|a, b| {
            progress_ratio(b)
                .partial_cmp(&progress_ratio(a))
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// Filter, search and sort in one pass, as the library list shows it.
pub fn library_view<'a>(
    books: &'a [Book],
    filter: StatusFilter,
    query: &str,
    sort: SortMode,
) -> Vec<&'a Book> {
    let mut view: Vec<&Book> = books
        .iter()
        .filter(|b| filter.matches(b.status) && matches_query(b, query))
        .collect();
    sort_books(&mut view, sort);
    view
}
