//! Storage engine: the single database handle and its three primitives.
//!
//! Every repository call funnels through [`Database::execute`],
//! [`Database::write`] or [`Database::query`]. Failures are logged once here
//! with the offending SQL and then propagated unchanged; nothing is retried.

use crate::error::{Error, Result};
use crate::ids::parse_timestamp;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Typed mapping from a result row to a domain struct.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Database handle owning the one connection used by the process.
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open database");
            Error::from(e)
        })?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Database opened");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Create the schema if it does not exist. Idempotent.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::create_schema(&conn).map_err(|e| {
            tracing::error!(error = %e, "Schema initialization failed");
            e
        })
    }

    /// File backing this database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lock the connection. A poisoned lock still hands out the connection:
    /// SQLite keeps its own consistency regardless of a panicked caller.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================
    // Primitives
    // ============================================

    /// Run one or more statements without parameters or result rows.
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.conn().execute_batch(sql).map_err(|e| {
            tracing::error!(sql, error = %e, "exec failed");
            Error::from(e)
        })
    }

    /// Run a parameterized insert/update/delete, returning affected rows.
    pub fn write<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        write_on(&self.conn(), sql, params)
    }

    /// Run a parameterized read, mapping every row to `T`.
    pub fn query<T: FromRow, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        query_on(&self.conn(), sql, params)
    }

    /// Run a parameterized read expected to yield at most one row.
    pub fn query_one<T: FromRow, P: Params>(&self, sql: &str, params: P) -> Result<Option<T>> {
        query_one_on(&self.conn(), sql, params)
    }

    // ============================================
    // Bulk operations
    // ============================================

    /// Delete every progress entry and every book. There is no undo.
    pub fn clear_all_data(&self) -> Result<()> {
        self.execute("DELETE FROM progress_entries; DELETE FROM books;")?;
        tracing::info!("All data cleared");
        Ok(())
    }
}

pub(crate) fn write_on<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<usize> {
    conn.prepare_cached(sql)
        .and_then(|mut stmt| stmt.execute(params))
        .map_err(|e| {
            tracing::error!(sql, error = %e, "write failed");
            Error::from(e)
        })
}

pub(crate) fn query_on<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    conn.prepare_cached(sql)
        .and_then(|mut stmt| {
            let rows = stmt
                .query_map(params, T::from_row)?
                .collect::<rusqlite::Result<Vec<T>>>();
            rows
        })
        .map_err(|e| {
            tracing::error!(sql, error = %e, "query failed");
            Error::from(e)
        })
}

pub(crate) fn query_one_on<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    conn.prepare_cached(sql)
        .and_then(|mut stmt| stmt.query_row(params, T::from_row).optional())
        .map_err(|e| {
            tracing::error!(sql, error = %e, "query failed");
            Error::from(e)
        })
}

/// Read a stored timestamp column.
pub(crate) fn timestamp_column(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(&raw).map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}
