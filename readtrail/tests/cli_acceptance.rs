use readtrail_core::{BookStatus, Database};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("readtrail/readtrail.db")
    }

    fn write_config(&self, contents: &str) {
        let dir = self.xdg_config.join("readtrail");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }

    fn open_db(&self) -> Database {
        let db = Database::open(&self.db_path()).expect("failed to open db");
        db.initialize().expect("failed to initialize db");
        db
    }
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("readtrail"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute readtrail: {e}"))
}

fn render_args(args: &[&str]) -> String {
    args.iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "readtrail {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        render_args(args),
        output.status,
        stdout,
        stderr
    );
}

/// Run and require success, returning stdout.
fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run_bin(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn add_book(env: &CliTestEnv, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    run_ok(env, &full).trim().to_string()
}

#[test]
fn add_progress_and_show_round_trip() {
    let env = CliTestEnv::new();

    let id = add_book(&env, &["--title", "Dune", "--author", "Frank Herbert", "--pages", "100"]);
    assert!(id.starts_with("book_"), "unexpected id: {id}");

    let stdout = run_ok(&env, &["progress", &id, "--page", "40", "--note", "spice"]);
    assert!(stdout.contains("40 / 100 pages (40%)"), "got:\n{stdout}");

    let db = env.open_db();
    let book = db.get_book(&id).unwrap().expect("book should exist");
    assert_eq!(book.current_page, 40);
    assert_eq!(book.progress_percent(), Some(40));
    let history = db.list_progress_entries_for_book(&id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].note, "spice");

    let show = run_ok(&env, &["show", &id]);
    assert!(show.contains("Dune"));
    assert!(show.contains("by Frank Herbert"));
    assert!(show.contains("History (1 entries)"));
    assert!(show.contains("\"spice\""));
}

#[test]
fn atomic_progress_updates_book() {
    let env = CliTestEnv::new();
    let id = add_book(&env, &["--title", "Emma", "--pages", "400"]);

    run_ok(&env, &["progress", &id, "--page", "100", "--atomic"]);

    let book = env.open_db().get_book(&id).unwrap().unwrap();
    assert_eq!(book.current_page, 100);
    assert_eq!(book.progress_percent(), Some(25));
}

#[test]
fn progress_for_unknown_book_fails_without_writing() {
    let env = CliTestEnv::new();

    for args in [
        vec!["progress", "nope", "--page", "3"],
        vec!["progress", "nope", "--page", "3", "--atomic"],
    ] {
        let output = run_bin(&env, &args);
        assert!(!output.status.success(), "{} should fail", render_args(&args));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("No book found"), "got:\n{stderr}");
    }

    assert!(env.open_db().list_progress_entries().unwrap().is_empty());
}

#[test]
fn invalid_input_is_rejected_before_storage() {
    let env = CliTestEnv::new();

    for args in [
        vec!["add", "--title", "   "],
        vec!["add", "--title", "Dune", "--pages", "-5"],
        vec!["add", "--title", "Dune", "--pages", "12.5"],
        vec!["add", "--title", "Dune", "--status", "abandoned"],
    ] {
        let output = run_bin(&env, &args);
        assert!(!output.status.success(), "{} should fail", render_args(&args));
    }

    assert!(
        !env.db_path().exists() || env.open_db().list_books().unwrap().is_empty(),
        "no book should have been stored"
    );
}

#[test]
fn edit_changes_fields_and_reports_missing() {
    let env = CliTestEnv::new();
    let id = add_book(&env, &["--title", "Draft", "--pages", "10"]);

    run_ok(&env, &["edit", &id, "--title", "Final", "--status", "finished", "--current", "10"]);

    let book = env.open_db().get_book(&id).unwrap().unwrap();
    assert_eq!(book.title, "Final");
    assert_eq!(book.status, BookStatus::Finished);
    assert_eq!(book.current_page, 10);
    assert_eq!(book.total_pages, 10);

    let output = run_bin(&env, &["edit", "nope", "--title", "X"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_bin(&env, &["edit", &id]);
    assert!(!output.status.success(), "edit without changes should fail");
}

#[test]
fn list_filters_searches_and_sorts() {
    let env = CliTestEnv::new();
    add_book(&env, &["--title", "Middlemarch", "--author", "George Eliot", "--pages", "800", "--current", "200"]);
    add_book(&env, &["--title", "Beloved", "--author", "Toni Morrison", "--pages", "300", "--current", "300", "--status", "finished"]);
    add_book(&env, &["--title", "Adam Bede", "--author", "George Eliot", "--pages", "600", "--status", "paused"]);

    let by_title = run_ok(&env, &["list", "--sort", "title"]);
    let titles: Vec<&str> = ["Adam Bede", "Beloved", "Middlemarch"].to_vec();
    let positions: Vec<usize> = titles
        .iter()
        .map(|t| by_title.find(t).unwrap_or_else(|| panic!("{t} missing in:\n{by_title}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "got:\n{by_title}");

    let eliot = run_ok(&env, &["list", "--search", "eliot"]);
    assert!(eliot.contains("Middlemarch"));
    assert!(eliot.contains("Adam Bede"));
    assert!(!eliot.contains("Beloved"));

    let finished = run_ok(&env, &["list", "--status", "finished"]);
    assert!(finished.contains("Beloved"));
    assert!(!finished.contains("Middlemarch"));

    let none = run_ok(&env, &["list", "--search", "zzz"]);
    assert!(none.contains("No books match."));
}

#[test]
fn list_uses_configured_defaults() {
    let env = CliTestEnv::new();
    env.write_config(
        r#"
[library]
default_status = "paused"
"#,
    );
    add_book(&env, &["--title", "Reading one"]);
    add_book(&env, &["--title", "Paused one", "--status", "paused"]);

    let stdout = run_ok(&env, &["list"]);
    assert!(stdout.contains("Paused one"));
    assert!(!stdout.contains("Reading one"));

    let stdout = run_ok(&env, &["list", "--status", "all"]);
    assert!(stdout.contains("Reading one"));
}

#[test]
fn delete_cascades_and_reports_missing() {
    let env = CliTestEnv::new();
    let id = add_book(&env, &["--title", "Dune", "--pages", "100"]);
    run_ok(&env, &["progress", &id, "--page", "10"]);
    run_ok(&env, &["progress", &id, "--page", "20"]);

    let entry_id = env.open_db().list_progress_entries().unwrap()[0].id.clone();
    run_ok(&env, &["delete-entry", &entry_id]);
    assert_eq!(env.open_db().list_progress_entries().unwrap().len(), 1);
    assert!(!run_bin(&env, &["delete-entry", &entry_id]).status.success());

    run_ok(&env, &["delete", &id]);
    let db = env.open_db();
    assert!(db.get_book(&id).unwrap().is_none());
    assert!(db.list_progress_entries().unwrap().is_empty());

    assert!(!run_bin(&env, &["delete", &id]).status.success());
}

#[test]
fn stats_json_reports_summary() {
    let env = CliTestEnv::new();
    let id = add_book(&env, &["--title", "Dune", "--pages", "200"]);
    add_book(&env, &["--title", "Zine"]);
    run_ok(&env, &["progress", &id, "--page", "50"]);

    let stdout = run_ok(&env, &["stats", "--json"]);
    let stats: serde_json::Value = serde_json::from_str(&stdout).expect("stats should be JSON");

    assert_eq!(stats["totalBooks"], 2);
    assert_eq!(stats["booksReading"], 2);
    assert_eq!(stats["totalPagesRead"], 50);
    assert_eq!(stats["totalPagesInLibrary"], 200);
    assert_eq!(stats["averageProgress"], 25);
    assert_eq!(stats["entriesLast7Days"], 1);
    assert_eq!(stats["streak"], 1);

    let text = run_ok(&env, &["stats"]);
    assert!(text.contains("Reading streak"));
    assert!(text.contains("1 day"));
}

#[test]
fn export_to_file_and_stdout() {
    let env = CliTestEnv::new();
    let id = add_book(&env, &["--title", "Dune", "--pages", "100"]);
    run_ok(&env, &["progress", &id, "--page", "40"]);

    let out = env.home.join("exports/library.json");
    let out_arg = out.to_string_lossy().into_owned();
    let stdout = run_ok(&env, &["export", "--output", &out_arg]);
    assert!(stdout.contains("Exported 1 books and 1 progress entries"));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("export file should exist")).unwrap();
    assert_eq!(doc["appVersion"], env!("CARGO_PKG_VERSION"));
    assert_eq!(doc["books"][0]["id"], id.as_str());
    assert_eq!(doc["books"][0]["currentPage"], 40);
    assert_eq!(doc["progressEntries"][0]["bookId"], id.as_str());

    let stdout = run_ok(&env, &["export", "--stdout"]);
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(doc["books"].as_array().map(Vec::len), Some(1));

    let conflicting = ["export", "--stdout", "--output", "x.json"];
    assert!(!run_bin(&env, &conflicting).status.success());
}

#[test]
fn export_defaults_to_configured_directory() {
    let env = CliTestEnv::new();
    let export_dir = env.home.join("my-exports");
    env.write_config(&format!(
        "[export]\ndirectory = {:?}\n",
        export_dir.to_string_lossy()
    ));

    run_ok(&env, &["export"]);

    let files: Vec<String> = fs::read_dir(&export_dir)
        .expect("export dir should exist")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("readtrail-export-"));
    assert!(files[0].ends_with(".json"));
}

#[test]
fn clear_requires_confirmation() {
    let env = CliTestEnv::new();
    add_book(&env, &["--title", "Dune"]);

    let output = run_bin(&env, &["clear"]);
    assert!(!output.status.success());
    assert_eq!(env.open_db().list_books().unwrap().len(), 1);

    run_ok(&env, &["clear", "--yes"]);
    assert!(env.open_db().list_books().unwrap().is_empty());
}

#[test]
fn seed_fills_only_empty_library() {
    let env = CliTestEnv::new();

    let stdout = run_ok(&env, &["seed"]);
    assert!(stdout.contains("Added 3 sample books."));

    let stdout = run_ok(&env, &["seed"]);
    assert!(stdout.contains("nothing seeded"));

    let list = run_ok(&env, &["list", "--sort", "title"]);
    assert!(list.contains("Atomic Habits"));
    assert!(list.contains("The Pragmatic Programmer"));
}

#[test]
fn db_flag_overrides_default_location() {
    let env = CliTestEnv::new();
    let custom = env.home.join("elsewhere/books.db");
    let custom_arg = custom.to_string_lossy().into_owned();

    add_book(&env, &["--db", &custom_arg, "--title", "Dune"]);

    assert!(custom.exists(), "database should be created at --db path");
    assert!(!env.db_path().exists());

    let list = run_ok(&env, &["list", "--db", &custom_arg]);
    assert!(list.contains("Dune"));
}
