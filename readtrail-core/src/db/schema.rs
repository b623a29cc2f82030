//! Database schema
//!
//! Tables are created with `CREATE ... IF NOT EXISTS`; there is no migration
//! chain. `PRAGMA user_version` is stamped for diagnostics only.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Schema batch, safe to run on every startup.
const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS books (
        id           TEXT PRIMARY KEY NOT NULL,
        title        TEXT NOT NULL,
        author       TEXT NOT NULL,
        totalPages   INTEGER NOT NULL,
        status       TEXT NOT NULL,
        currentPage  INTEGER NOT NULL,
        createdAt    TEXT NOT NULL,
        updatedAt    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS progress_entries (
        id           TEXT PRIMARY KEY NOT NULL,
        bookId       TEXT NOT NULL,
        page         INTEGER NOT NULL,
        note         TEXT NOT NULL,
        createdAt    TEXT NOT NULL,
        FOREIGN KEY (bookId) REFERENCES books(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_progress_entries_bookId ON progress_entries(bookId);
"#;

/// Create tables and indexes if they do not exist yet.
pub fn create_schema(conn: &Connection) -> crate::error::Result<()> {
    let current_version = get_schema_version(conn)?;

    conn.execute_batch(SCHEMA)?;

    if current_version < SCHEMA_VERSION {
        conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Schema created"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
