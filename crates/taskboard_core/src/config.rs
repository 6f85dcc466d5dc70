//! Board configuration loaded from TOML.
//!
//! # Invariants
//! - A missing file yields defaults; a present file must parse.
//! - Fields missing from the file take their defaults.

use crate::logging::LogLevel;
use crate::service::board_service::DEFAULT_AUTHOR;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "taskboard";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "taskboard.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// SQLite file backing the key-value medium.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Author recorded on new comments.
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            log_level: LogLevel::default(),
            log_dir: default_log_dir(),
            author: default_author(),
        }
    }
}

impl BoardConfig {
    /// Default config file location: `<config dir>/taskboard/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn default_database() -> PathBuf {
    data_dir().join(DATABASE_FILE_NAME)
}

fn default_log_dir() -> PathBuf {
    data_dir().join(LOG_DIR_NAME)
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};
    use crate::logging::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn missing_fields_take_defaults() {
        let config = BoardConfig::from_toml("author = \"Ana\"\nlog_level = \"warn\"\n").unwrap();
        let defaults = BoardConfig::default();
        assert_eq!(config.author, "Ana");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.database, defaults.database);
        assert_eq!(config.log_dir, defaults.log_dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = [").unwrap();

        let err = BoardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: p, .. } if p == path));
    }

    #[test]
    fn database_path_is_read_verbatim() {
        let config = BoardConfig::from_toml("database = \"/tmp/board.sqlite3\"").unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/board.sqlite3"));
    }
}
