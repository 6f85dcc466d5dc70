use rusqlite::Connection;
use taskboard_core::db::migrations::latest_version;
use taskboard_core::db::{open_db, open_db_in_memory, DbError};
use taskboard_core::{KeyValueStore, SqliteKeyValueStore, StoreError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(latest_version(), 1);
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
    assert!(table_columns(&conn, "kv_entries").contains(&"updated_at".to_string()));
}

#[test]
fn opening_same_database_twice_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteKeyValueStore::try_new(&conn_first)
        .unwrap()
        .set_item("projects", "[]")
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let store = SqliteKeyValueStore::try_new(&conn_second).unwrap();
    assert_eq!(store.get_item("projects").unwrap().as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("upgrade taskboard"));
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        StoreError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_columns(conn: &Connection, table_name: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        columns.push(row.get::<_, String>(1).unwrap());
    }
    columns
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
