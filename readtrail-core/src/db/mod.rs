//! Database layer for readtrail
//!
//! This module provides the storage layer using SQLite with:
//! - An owned single-connection handle and three statement primitives
//! - Book and progress entry repositories built on those primitives
//! - "Create if not exists" schema setup

mod books;
mod progress;
pub mod schema;
mod storage;

pub use progress::RecordedProgress;
pub use storage::{Database, FromRow};
