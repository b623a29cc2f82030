//! Book repository.

use super::storage::{timestamp_column, write_on, Database, FromRow};
use crate::error::Result;
use crate::ids::{self, to_timestamp};
use crate::types::{Book, BookPatch, NewBook};
use rusqlite::{params, Connection, Row};

pub(crate) const SELECT_BOOK_BY_ID: &str = "
    SELECT id, title, author, totalPages, status, currentPage, createdAt, updatedAt
    FROM books
    WHERE id = ?1
    LIMIT 1";

const UPDATE_BOOK: &str = "
    UPDATE books
    SET title = ?1, author = ?2, totalPages = ?3, status = ?4, currentPage = ?5, updatedAt = ?6
    WHERE id = ?7";

const INSERT_BOOK: &str = "
    INSERT INTO books (id, title, author, totalPages, status, currentPage, createdAt, updatedAt)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SELECT_ALL_BOOKS: &str = "
    SELECT id, title, author, totalPages, status, currentPage, createdAt, updatedAt
    FROM books
    ORDER BY updatedAt DESC";

impl FromRow for Book {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Book {
            id: row.get("id")?,
            title: row.get("title")?,
            author: row.get("author")?,
            total_pages: row.get("totalPages")?,
            status: row.get("status")?,
            current_page: row.get("currentPage")?,
            created_at: timestamp_column(row, "createdAt")?,
            updated_at: timestamp_column(row, "updatedAt")?,
        })
    }
}

impl Database {
    /// Insert a new book and return it fully populated.
    ///
    /// Missing timestamps default to now. A duplicate id is a storage error.
    pub fn create_book(&self, input: NewBook) -> Result<Book> {
        let now = ids::now();
        let book = Book {
            id: input.id,
            title: input.title,
            author: input.author,
            total_pages: input.total_pages,
            status: input.status,
            current_page: input.current_page,
            created_at: input.created_at.map(ids::normalize).unwrap_or(now),
            updated_at: input.updated_at.map(ids::normalize).unwrap_or(now),
        };

        self.write(
            INSERT_BOOK,
            params![
                book.id,
                book.title,
                book.author,
                book.total_pages,
                book.status,
                book.current_page,
                to_timestamp(&book.created_at),
                to_timestamp(&book.updated_at),
            ],
        )?;

        tracing::debug!(book_id = %book.id, "Book created");
        Ok(book)
    }

    /// Merge `patch` over the stored book and write it back.
    ///
    /// Returns `None` when no book has this id.
    pub fn update_book(&self, id: &str, patch: &BookPatch) -> Result<Option<Book>> {
        let Some(existing) = self.get_book(id)? else {
            return Ok(None);
        };

        let next = patch.apply(&existing, ids::now());
        let next = Book {
            updated_at: ids::normalize(next.updated_at),
            ..next
        };

        write_book(&self.conn(), &next)?;

        tracing::debug!(book_id = %next.id, "Book updated");
        Ok(Some(next))
    }

    /// Delete a book and, through the foreign key cascade, its progress
    /// entries. Returns whether a row was removed.
    pub fn delete_book(&self, id: &str) -> Result<bool> {
        let changed = self.write("DELETE FROM books WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// All books, most recently updated first.
    pub fn list_books(&self) -> Result<Vec<Book>> {
        self.query(SELECT_ALL_BOOKS, [])
    }

    /// Get a book by ID
    pub fn get_book(&self, id: &str) -> Result<Option<Book>> {
        self.query_one(SELECT_BOOK_BY_ID, params![id])
    }
}

/// Write every mutable column of `book` back to its row.
pub(crate) fn write_book(conn: &Connection, book: &Book) -> Result<usize> {
    write_on(
        conn,
        UPDATE_BOOK,
        params![
            book.title,
            book.author,
            book.total_pages,
            book.status,
            book.current_page,
            to_timestamp(&book.updated_at),
            book.id,
        ],
    )
}
