//! Sample library for trying the app out.

use crate::db::Database;
use crate::error::Result;
use crate::types::{BookStatus, NewBook};

/// Insert three sample books, one per status, when the library is empty.
///
/// Returns how many books were inserted (0 if any book already existed).
pub fn seed_sample_library(db: &Database) -> Result<usize> {
    if !db.list_books()?.is_empty() {
        tracing::debug!("Library not empty, skipping seed");
        return Ok(0);
    }

    let samples = [
        ("seed-1", "Atomic Habits", "James Clear", 320, BookStatus::Reading, 42),
        ("seed-2", "Deep Work", "Cal Newport", 304, BookStatus::Paused, 0),
        (
            "seed-3",
            "The Pragmatic Programmer",
            "Andrew Hunt & David Thomas",
            352,
            BookStatus::Finished,
            352,
        ),
    ];

    for (id, title, author, total_pages, status, current_page) in samples {
        db.create_book(NewBook {
            id: id.to_string(),
            status,
            current_page,
            ..NewBook::new(title, author, total_pages)
        })?;
    }

    tracing::info!(count = samples.len(), "Sample books inserted");
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_only_fills_empty_library() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        assert_eq!(seed_sample_library(&db).unwrap(), 3);
        assert_eq!(seed_sample_library(&db).unwrap(), 0);

        let books = db.list_books().unwrap();
        assert_eq!(books.len(), 3);
        for status in BookStatus::ALL {
            assert_eq!(books.iter().filter(|b| b.status == status).count(), 1);
        }

        let finished = db.get_book("seed-3").unwrap().unwrap();
        assert_eq!(finished.progress_percent(), Some(100));
    }
}
