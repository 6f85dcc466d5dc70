//! SQLite file behind the board's key-value medium.
//!
//! The board keeps one JSON document per key (`projects`,
//! `task_comments_<id>`); this module owns the database those keys live in.
//!
//! # Invariants
//! - Schema version is `PRAGMA user_version`; a board file written by a
//!   newer build is refused rather than downgraded.
//! - `kv_entries` is never touched before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A schema step failed; the board file is left at its previous version.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The board file was written by a newer taskboard.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "board database error: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "board schema step {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "board database schema version {db_version} is newer than supported {latest_supported}; upgrade taskboard"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
