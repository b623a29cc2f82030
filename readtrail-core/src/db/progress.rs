//! Progress entry repository.
//!
//! Entries are append-only snapshots. Adding an entry never touches the
//! parent book: callers either follow up with [`Database::update_book`]
//! (two separate writes, the second may fail independently) or use
//! [`Database::record_progress`], which does both in one transaction.

use super::books::{write_book, SELECT_BOOK_BY_ID};
use super::storage::{query_one_on, timestamp_column, write_on, Database, FromRow};
use crate::error::Result;
use crate::ids::{self, to_timestamp};
use crate::types::{Book, BookPatch, NewProgressEntry, ProgressEntry};
use rusqlite::{params, Connection, Row};

const INSERT_ENTRY: &str = "
    INSERT INTO progress_entries (id, bookId, page, note, createdAt)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_ENTRIES_FOR_BOOK: &str = "
    SELECT id, bookId, page, note, createdAt
    FROM progress_entries
    WHERE bookId = ?1
    ORDER BY createdAt DESC";

const SELECT_ALL_ENTRIES: &str = "
    SELECT id, bookId, page, note, createdAt
    FROM progress_entries
    ORDER BY createdAt DESC";

impl FromRow for ProgressEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ProgressEntry {
            id: row.get("id")?,
            book_id: row.get("bookId")?,
            page: row.get("page")?,
            note: row.get("note")?,
            created_at: timestamp_column(row, "createdAt")?,
        })
    }
}

/// Result of [`Database::record_progress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProgress {
    pub entry: ProgressEntry,
    /// The book after its current page was moved
    pub book: Book,
}

impl Database {
    /// Append a progress entry. The parent book is left untouched.
    ///
    /// Fails with a storage error if the book does not exist (foreign key)
    /// or the id is already taken.
    pub fn add_progress_entry(&self, input: NewProgressEntry) -> Result<ProgressEntry> {
        let entry = build_entry(input, ids::now());
        insert_entry(&self.conn(), &entry)?;

        tracing::debug!(entry_id = %entry.id, book_id = %entry.book_id, page = entry.page, "Progress entry added");
        Ok(entry)
    }

    /// Append a progress entry and move the book's current page to it, both
    /// in a single transaction.
    ///
    /// Returns `None`, having written nothing, when the book does not exist.
    /// The book's `updated_at` is set to the entry's `created_at`.
    pub fn record_progress(&self, input: NewProgressEntry) -> Result<Option<RecordedProgress>> {
        let now = ids::now();
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let Some(existing) = query_one_on::<Book, _>(&tx, SELECT_BOOK_BY_ID, params![input.book_id])?
        else {
            return Ok(None);
        };

        let entry = build_entry(input, now);
        insert_entry(&tx, &entry)?;

        let patch = BookPatch {
            current_page: Some(entry.page),
            updated_at: Some(entry.created_at),
            ..Default::default()
        };
        let book = patch.apply(&existing, now);
        write_book(&tx, &book)?;

        tx.commit()?;

        tracing::debug!(entry_id = %entry.id, book_id = %book.id, page = entry.page, "Progress recorded");
        Ok(Some(RecordedProgress { entry, book }))
    }

    /// Entries for one book, newest first.
    pub fn list_progress_entries_for_book(&self, book_id: &str) -> Result<Vec<ProgressEntry>> {
        self.query(SELECT_ENTRIES_FOR_BOOK, params![book_id])
    }

    /// Every entry across all books, newest first.
    pub fn list_progress_entries(&self) -> Result<Vec<ProgressEntry>> {
        self.query(SELECT_ALL_ENTRIES, [])
    }

    /// Delete one entry. Returns whether a row was removed.
    pub fn delete_progress_entry(&self, id: &str) -> Result<bool> {
        let changed = self.write("DELETE FROM progress_entries WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

fn build_entry(input: NewProgressEntry, now: chrono::DateTime<chrono::Utc>) -> ProgressEntry {
    ProgressEntry {
        id: input.id,
        book_id: input.book_id,
        page: input.page,
        note: input.note,
        created_at: input.created_at.map(ids::normalize).unwrap_or(now),
    }
}

fn insert_entry(conn: &Connection, entry: &ProgressEntry) -> Result<usize> {
    write_on(
        conn,
        INSERT_ENTRY,
        params![
            entry.id,
            entry.book_id,
            entry.page,
            entry.note,
            to_timestamp(&entry.created_at),
        ],
    )
}
