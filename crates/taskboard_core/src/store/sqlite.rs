//! SQLite-backed key-value medium over the `kv_entries` table.

use super::{KeyValueStore, StoreError, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store persisting into a migrated SQLite connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Creates a store from a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_entries
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query([prefix])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}
