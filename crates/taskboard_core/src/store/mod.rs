//! Key-value persistence medium.
//!
//! # Responsibility
//! - Define the string-to-string storage contract the board persists into.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set_item` overwrites; there is no merge, versioning or locking.
//! - `get_item` on a missing key returns `Ok(None)`, never an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by key-value media and the stores built on them.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Value could not be encoded for storage.
    Serialize(serde_json::Error),
    /// Stored value exists but does not have the expected shape.
    Corrupt(String),
    /// Medium refused the operation (quota, read-only, closed handle).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Serialize(err) => write!(f, "failed to encode stored value: {err}"),
            Self::Corrupt(message) => write!(f, "invalid stored data: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Corrupt(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value medium, modelled on browser local storage.
pub trait KeyValueStore {
    /// Loads the raw value for `key`.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> StoreResult<()>;
    /// Lists keys starting with `prefix`, sorted ascending.
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}
