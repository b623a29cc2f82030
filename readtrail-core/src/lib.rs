//! # readtrail-core
//!
//! Core library for readtrail - a personal reading tracker.
//!
//! This library provides:
//! - Domain types for books and progress entries
//! - Database storage layer with SQLite
//! - Library views and reading statistics
//! - JSON export, configuration and logging infrastructure
//!
//! ## Architecture
//!
//! - **Storage:** one owned [`Database`] handle; every repository call goes
//!   through its `execute` / `write` / `query` primitives
//! - **Repositories:** book and progress entry CRUD as methods on [`Database`]
//! - **Analytics:** pure functions over loaded rows, no storage access
//!
//! ## Example
//!
//! ```rust,no_run
//! use readtrail_core::{Config, Database, NewBook, NewProgressEntry};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.initialize().expect("failed to create schema");
//!
//! let book = db.create_book(NewBook::new("Dune", "Frank Herbert", 412)).unwrap();
//! db.record_progress(NewProgressEntry::new(&book.id, 40)).unwrap();
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, FromRow, RecordedProgress};
pub use error::{Error, Result};
pub use export::ExportDocument;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod ids;
pub mod logging;
pub mod seed;
pub mod types;
