//! Analytics module for readtrail
//!
//! Pure functions over loaded books and progress entries:
//! - Library views (status filter, search, sort, progress percentage)
//! - Reading statistics (counts, activity windows, streak)
//!
//! Nothing in here touches the database; callers load the data first.

pub mod library;
pub mod stats;

pub use library::{
    filter_by_status, library_view, progress_percent, search, sort_books, SortMode, StatusFilter,
};
pub use stats::{compute_stats, reading_streak, ReadingStats};
