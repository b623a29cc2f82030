//! Core domain types for readtrail
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Book** | A catalog entry for one reading item, with a status and a current page |
//! | **ProgressEntry** | One timestamped snapshot of the page reached in a Book, with an optional note |
//! | **Streak** | Consecutive calendar days, counted back from today, with at least one ProgressEntry |
//!
//! Serialized field names are camelCase because the same shapes are written
//! verbatim into the JSON export document.

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

// ============================================
// Book
// ============================================

/// Reading status of a book.
///
/// Stored as free-form text; the application only ever writes these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Reading,
    Paused,
    Finished,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::Reading, BookStatus::Paused, BookStatus::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Reading => "reading",
            BookStatus::Paused => "paused",
            BookStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reading" => Ok(BookStatus::Reading),
            "paused" => Ok(BookStatus::Paused),
            "finished" => Ok(BookStatus::Finished),
            _ => Err(format!("unknown book status: {}", s)),
        }
    }
}

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// A book in the reading catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque unique identifier, immutable once created
    pub id: String,
    /// Display title (never empty)
    pub title: String,
    /// Display author (may be empty)
    pub author: String,
    /// Total page count; 0 means unknown
    pub total_pages: i64,
    pub status: BookStatus,
    /// Last page reached; not clamped to `total_pages`
    pub current_page: i64,
    #[serde(with = "crate::ids::serde_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    #[serde(with = "crate::ids::serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Percentage read, or `None` when the total page count is unknown.
    pub fn progress_percent(&self) -> Option<u8> {
        crate::analytics::progress_percent(self.current_page, self.total_pages)
    }
}

/// Input for creating a book. Timestamps default to "now" when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub total_pages: i64,
    pub status: BookStatus,
    pub current_page: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewBook {
    /// A new book with a freshly generated id, no pages read, status `reading`.
    pub fn new(title: impl Into<String>, author: impl Into<String>, total_pages: i64) -> Self {
        Self {
            id: crate::ids::new_book_id(),
            title: title.into(),
            author: author.into(),
            total_pages,
            status: BookStatus::Reading,
            current_page: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial update for a book.
///
/// `id` and `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub total_pages: Option<i64>,
    pub status: Option<BookStatus>,
    pub current_page: Option<i64>,
    /// Explicit `updated_at`; defaults to "now"
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookPatch {
    /// Patch that only moves the current page.
    pub fn current_page(page: i64) -> Self {
        Self {
            current_page: Some(page),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.total_pages.is_none()
            && self.status.is_none()
            && self.current_page.is_none()
            && self.updated_at.is_none()
    }

    /// Merge this patch over `book`, stamping `updated_at` with `now` unless
    /// the patch carries its own.
    pub fn apply(&self, book: &Book, now: DateTime<Utc>) -> Book {
        Book {
            id: book.id.clone(),
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            author: self.author.clone().unwrap_or_else(|| book.author.clone()),
            total_pages: self.total_pages.unwrap_or(book.total_pages),
            status: self.status.unwrap_or(book.status),
            current_page: self.current_page.unwrap_or(book.current_page),
            created_at: book.created_at,
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

// ============================================
// Progress
// ============================================

/// One snapshot of reading progress. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    /// Owning book; the entry is removed when the book is deleted
    pub book_id: String,
    pub page: i64,
    /// Free text, may be empty
    pub note: String,
    #[serde(with = "crate::ids::serde_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Input for recording a progress entry. `created_at` defaults to "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgressEntry {
    pub id: String,
    pub book_id: String,
    pub page: i64,
    pub note: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewProgressEntry {
    /// A new entry with a freshly generated id and an empty note.
    pub fn new(book_id: impl Into<String>, page: i64) -> Self {
        Self {
            id: crate::ids::new_progress_id(),
            book_id: book_id.into(),
            page,
            note: String::new(),
            created_at: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}
