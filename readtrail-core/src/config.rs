//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/readtrail/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/readtrail/` (~/.config/readtrail/)
//! - Data: `$XDG_DATA_HOME/readtrail/` (~/.local/share/readtrail/)
//! - State/Logs: `$XDG_STATE_HOME/readtrail/` (~/.local/state/readtrail/)

use crate::analytics::{SortMode, StatusFilter};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "readtrail";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Database location override
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Defaults for the library list
    #[serde(default)]
    pub library: LibraryConfig,

    /// Export destination
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Use this file instead of the XDG data directory
    pub path: Option<PathBuf>,
}

/// Library list defaults, used when the command line does not say otherwise
#[derive(Debug, Deserialize, Default)]
pub struct LibraryConfig {
    #[serde(default)]
    pub default_sort: SortMode,

    #[serde(default)]
    pub default_status: StatusFilter,
}

/// Export configuration
#[derive(Debug, Deserialize, Default)]
pub struct ExportConfig {
    /// Directory for export files; the current directory when unset
    pub directory: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Database file to open: the configured override, else the XDG default.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(Self::default_database_path)
    }

    /// Directory export files are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/readtrail/config.toml` (~/.config/readtrail/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/readtrail/` (~/.local/share/readtrail/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join(APP_DIR)
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/readtrail/` (~/.local/state/readtrail/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// `$XDG_DATA_HOME/readtrail/readtrail.db`
    pub fn default_database_path() -> PathBuf {
        Self::data_dir().join("readtrail.db")
    }

    /// `$XDG_STATE_HOME/readtrail/readtrail.log`
    ///
    /// This is the prefix of the daily log files, which get a `.YYYY-MM-DD`
    /// suffix; see `logging::log_file_path` for today's file.
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("readtrail.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.path.is_none());
        assert_eq!(config.library.default_sort, SortMode::Recent);
        assert_eq!(config.library.default_status, StatusFilter::All);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[database]
path = "/tmp/books.db"

[library]
default_sort = "title"
default_status = "finished"

[export]
directory = "/tmp/exports"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/books.db"));
        assert_eq!(config.library.default_sort, SortMode::Title);
        assert_eq!(config.library.default_status, StatusFilter::Finished);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_rejects_unknown_sort() {
        let toml = r#"
[library]
default_sort = "shuffle"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_from_reports_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging\nlevel = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_paths_are_namespaced() {
        assert!(Config::default_database_path().ends_with("readtrail/readtrail.db"));
        assert!(Config::log_path().ends_with("readtrail/readtrail.log"));
        assert!(Config::config_path().ends_with("readtrail/config.toml"));
    }
}
