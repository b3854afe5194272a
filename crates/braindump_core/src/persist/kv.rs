//! Key-value backends for snapshot documents.

use super::{PersistError, PersistResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// String key-value store with local-storage semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
}

/// SQLite-backed store over the `kv_entries` table.
///
/// The connection must come from `db::open_db` / `db::open_db_in_memory` so
/// that migrations have run.
#[derive(Debug)]
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
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

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store, used for ephemeral sessions and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail, simulating an exhausted storage quota.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_writable(&self) -> PersistResult<()> {
        if self.read_only {
            return Err(PersistError::Backend("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.ensure_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKvStore, SqliteKvStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_store_upserts() {
        let mut kv = SqliteKvStore::new(open_db_in_memory().unwrap());
        assert_eq!(kv.get("k").unwrap(), None);

        kv.set("k", "one").unwrap();
        kv.set("k", "two").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(kv.get("other").unwrap(), None);
    }

    #[test]
    fn read_only_memory_store_rejects_writes() {
        let mut kv = MemoryKvStore::new();
        kv.set("k", "v").unwrap();
        kv.set_read_only(true);
        assert!(kv.set("k", "w").is_err());
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
    }
}
