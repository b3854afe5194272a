use braindump_core::db::migrations::{current_user_version, latest_version};
use braindump_core::db::{open_db, open_db_in_memory, DbError};
use braindump_core::{KeyValueStore, SqliteKvStore, ITEMS_KEY};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn reopening_file_database_keeps_schema_and_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braindump.sqlite3");

    let mut kv = SqliteKvStore::new(open_db(&path).unwrap());
    kv.set(ITEMS_KEY, "[]").unwrap();
    drop(kv);

    let reopened = SqliteKvStore::new(open_db(&path).unwrap());
    assert_eq!(
        current_user_version(reopened.connection()).unwrap(),
        latest_version()
    );
    assert_eq!(reopened.get(ITEMS_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
