use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use taskboard_core::db::DbError;
use taskboard_core::{BoardError, ConfigError, StoreError};

pub type CliResult<T> = Result<T, CliError>;

/// Failures surfaced to the terminal as `error: <message>`.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    CreateDataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Db(DbError),
    Store(StoreError),
    Board(BoardError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::CreateDataDir { path, source } => {
                write!(f, "failed to create {}: {source}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::CreateDataDir { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Board(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}
