//! JSON export of the whole library.
//!
//! The export is a one-way dump of both tables; there is no import.

use crate::db::Database;
use crate::error::Result;
use crate::ids;
use crate::types::{Book, ProgressEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot written to disk by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(with = "crate::ids::serde_timestamp")]
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    /// Most recently updated first
    pub books: Vec<Book>,
    /// Newest first
    pub progress_entries: Vec<ProgressEntry>,
}

impl ExportDocument {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;

        tracing::info!(
            path = %path.display(),
            books = self.books.len(),
            entries = self.progress_entries.len(),
            "Export written"
        );
        Ok(())
    }
}

/// Default export file name, e.g. `readtrail-export-1719849600000.json`.
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("readtrail-export-{}.json", now.timestamp_millis())
}

impl Database {
    /// Read both tables into an [`ExportDocument`] stamped with the current time.
    pub fn export_snapshot(&self, app_version: &str) -> Result<ExportDocument> {
        let books = self.list_books()?;
        let progress_entries = self.list_progress_entries()?;

        Ok(ExportDocument {
            exported_at: ids::now(),
            app_version: app_version.to_string(),
            books,
            progress_entries,
        })
    }
}
