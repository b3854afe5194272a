//! Runtime configuration for a capture session.
//!
//! # Invariants
//! - `data_dir` is absolute.
//! - `log_level` is one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default SQLite file holding the key-value snapshots.
pub const DEFAULT_DB_FILE_NAME: &str = "braindump.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDataDir(PathBuf),
    EmptyDbFileName,
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
            Self::EmptyDbFileName => write!(f, "db_file_name cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Where and how a capture session persists state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    data_dir: PathBuf,
    db_file_name: String,
    log_level: &'static str,
    /// Restore the default categories after `clear_all`.
    pub reseed_categories_on_clear: bool,
}

impl CoreConfig {
    /// Builds a config rooted at an absolute data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        if !data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(data_dir));
        }

        Ok(Self {
            data_dir,
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level(),
            reseed_categories_on_clear: true,
        })
    }

    pub fn with_db_file_name(mut self, name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyDbFileName);
        }
        self.db_file_name = name.to_string();
        Ok(self)
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn log_level(&self) -> &'static str {
        self.log_level
    }
}
