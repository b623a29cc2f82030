//! readtrail - Personal Reading Tracker
//!
//! Command-line front end for keeping a library of books, logging the page
//! reached in each, and summarizing reading activity.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use readtrail_core::analytics::{compute_stats, library_view, SortMode, StatusFilter};
use readtrail_core::export::default_file_name;
use readtrail_core::seed::seed_sample_library;
use readtrail_core::{BookPatch, BookStatus, Config, Database, NewBook, NewProgressEntry};

#[derive(Parser)]
#[command(name = "readtrail")]
#[command(about = "Track the books you read and how far you got")]
#[command(version)]
struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a book to the library
    Add(AddArgs),

    /// Change fields of an existing book
    Edit(EditArgs),

    /// List books, optionally filtered and sorted
    List(ListArgs),

    /// Show one book with its progress history
    Show {
        /// Book ID
        id: String,
    },

    /// Log the page you reached in a book
    Progress(ProgressArgs),

    /// Delete a book and all of its progress entries
    Delete {
        /// Book ID
        id: String,
    },

    /// Delete a single progress entry
    DeleteEntry {
        /// Progress entry ID
        id: String,
    },

    /// Reading statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all books and progress entries as JSON
    Export {
        /// Output file (default: a timestamped file in the export directory)
        #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the JSON to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Delete every book and progress entry
    Clear {
        /// Confirm; nothing is deleted without it
        #[arg(long)]
        yes: bool,
    },

    /// Insert sample books into an empty library
    Seed,
}

#[derive(Args)]
struct AddArgs {
    /// Book title
    #[arg(short, long, value_parser = non_empty)]
    title: String,

    /// Author
    #[arg(short, long, default_value = "")]
    author: String,

    /// Total page count (0 = unknown)
    #[arg(short, long, default_value_t = 0)]
    pages: u32,

    /// Reading status: reading, paused or finished
    #[arg(short, long, default_value_t = BookStatus::Reading)]
    status: BookStatus,

    /// Page already reached
    #[arg(short, long, default_value_t = 0)]
    current: u32,
}

#[derive(Args)]
struct EditArgs {
    /// Book ID
    id: String,

    #[arg(short, long, value_parser = non_empty)]
    title: Option<String>,

    #[arg(short, long)]
    author: Option<String>,

    #[arg(short, long)]
    pages: Option<u32>,

    #[arg(short, long)]
    status: Option<BookStatus>,

    #[arg(short, long)]
    current: Option<u32>,
}

#[derive(Args)]
struct ListArgs {
    /// Status filter: all, reading, paused or finished
    #[arg(long)]
    status: Option<StatusFilter>,

    /// Case-insensitive match on title or author
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Sort order: recent, title, author or progress
    #[arg(long)]
    sort: Option<SortMode>,
}

#[derive(Args)]
struct ProgressArgs {
    /// Book ID
    id: String,

    /// Page reached
    #[arg(short, long)]
    page: u32,

    /// Optional note for this entry
    #[arg(short, long, default_value = "")]
    note: String,

    /// Save the entry and the new current page in one transaction
    #[arg(long)]
    atomic: bool,
}

/// Reject titles that are empty once trimmed.
fn non_empty(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("title cannot be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, stdout is for command output)
    let _log_guard =
        readtrail_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.initialize().context("failed to initialize database schema")?;

    run(cli.command, &db, &config)
}

fn run(command: Command, db: &Database, config: &Config) -> Result<()> {
    match command {
        Command::Add(args) => add_book(db, args),
        Command::Edit(args) => edit_book(db, args),
        Command::List(args) => list_books(db, config, args),
        Command::Show { id } => show_book(db, &id),
        Command::Progress(args) => log_progress(db, args),
        Command::Delete { id } => {
            if !db.delete_book(&id).context("failed to delete book")? {
                anyhow::bail!("No book found with ID '{}'", id);
            }
            println!("Deleted book {}", id);
            Ok(())
        }
        Command::DeleteEntry { id } => {
            if !db
                .delete_progress_entry(&id)
                .context("failed to delete progress entry")?
            {
                anyhow::bail!("No progress entry found with ID '{}'", id);
            }
            println!("Deleted progress entry {}", id);
            Ok(())
        }
        Command::Stats { json } => show_stats(db, json),
        Command::Export { output, stdout } => export(db, config, output, stdout),
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete all data without --yes");
            }
            db.clear_all_data().context("failed to clear data")?;
            println!("All books and progress entries deleted.");
            Ok(())
        }
        Command::Seed => {
            let inserted = seed_sample_library(db).context("failed to seed library")?;
            if inserted == 0 {
                println!("Library is not empty; nothing seeded.");
            } else {
                println!("Added {} sample books.", inserted);
            }
            Ok(())
        }
    }
}

fn add_book(db: &Database, args: AddArgs) -> Result<()> {
    let book = db
        .create_book(NewBook {
            status: args.status,
            current_page: i64::from(args.current),
            ..NewBook::new(args.title, args.author, i64::from(args.pages))
        })
        .context("failed to save book")?;

    println!("{}", book.id);
    Ok(())
}

fn edit_book(db: &Database, args: EditArgs) -> Result<()> {
    let patch = BookPatch {
        title: args.title,
        author: args.author,
        total_pages: args.pages.map(i64::from),
        status: args.status,
        current_page: args.current.map(i64::from),
        updated_at: None,
    };

    if patch.is_empty() {
        anyhow::bail!("Nothing to change: pass at least one of --title, --author, --pages, --status, --current");
    }

    match db.update_book(&args.id, &patch).context("failed to save book")? {
        Some(book) => {
            println!("Updated {}", book.id);
            Ok(())
        }
        None => anyhow::bail!("No book found with ID '{}'", args.id),
    }
}

fn list_books(db: &Database, config: &Config, args: ListArgs) -> Result<()> {
    let books = db.list_books().context("failed to load books")?;

    if books.is_empty() {
        println!("No books yet. Add one with `readtrail add --title <TITLE>`.");
        return Ok(());
    }

    let filter = args.status.unwrap_or(config.library.default_status);
    let sort = args.sort.unwrap_or(config.library.default_sort);
    let query = args.search.unwrap_or_default();

    let view = library_view(&books, filter, &query, sort);
    if view.is_empty() {
        println!("No books match.");
        return Ok(());
    }

    let now = Utc::now();
    for book in view {
        println!("{}", render::book_row(book, now));
    }
    Ok(())
}

fn show_book(db: &Database, id: &str) -> Result<()> {
    let Some(book) = db.get_book(id).context("failed to load book")? else {
        anyhow::bail!("No book found with ID '{}'", id);
    };
    let history = db
        .list_progress_entries_for_book(id)
        .context("failed to load progress history")?;

    print!("{}", render::book_detail(&book, &history, Utc::now()));
    Ok(())
}

fn log_progress(db: &Database, args: ProgressArgs) -> Result<()> {
    let entry = NewProgressEntry::new(&args.id, i64::from(args.page)).with_note(args.note);

    let book = if args.atomic {
        match db.record_progress(entry).context("failed to save progress")? {
            Some(recorded) => recorded.book,
            None => anyhow::bail!("No book found with ID '{}'", args.id),
        }
    } else {
        let Some(book) = db.get_book(&args.id).context("failed to load book")? else {
            anyhow::bail!("No book found with ID '{}'", args.id);
        };

        db.add_progress_entry(entry).context("failed to save progress")?;

        // The entry is already saved; a failure here only leaves the
        // book's current page stale.
        let moved = db
            .update_book(&args.id, &BookPatch::current_page(i64::from(args.page)))
            .map_err(|e| tracing::warn!(book_id = %args.id, error = %e, "Current page update failed"))
            .ok()
            .flatten();

        match moved {
            Some(updated) => updated,
            None => {
                eprintln!("warning: progress saved, but the book's current page could not be updated");
                book
            }
        }
    };

    println!(
        "{}: {} ({})",
        book.title,
        render::pages(&book),
        readtrail_core::format::format_percent(book.progress_percent())
    );
    Ok(())
}

fn show_stats(db: &Database, json: bool) -> Result<()> {
    let books = db.list_books().context("failed to load books")?;
    let entries = db
        .list_progress_entries()
        .context("failed to load progress entries")?;

    let stats = compute_stats(&books, &entries, &Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render::stats(&stats));
    }
    Ok(())
}

fn export(db: &Database, config: &Config, output: Option<PathBuf>, stdout: bool) -> Result<()> {
    let doc = db
        .export_snapshot(env!("CARGO_PKG_VERSION"))
        .context("failed to read data for export")?;

    if stdout {
        println!("{}", doc.to_json()?);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| config.export_dir().join(default_file_name(doc.exported_at)));
    doc.write_to(&path).context("failed to write export file")?;

    println!(
        "Exported {} books and {} progress entries to {}",
        doc.books.len(),
        doc.progress_entries.len(),
        path.display()
    );
    Ok(())
}
