//! Persistence adapter for store snapshots.
//!
//! # Responsibility
//! - Define the key-value contract standing in for browser local storage.
//! - Load and save the two full-replace snapshots (`items-store`,
//!   `categories-store`).
//! - Produce and parse the transportable export document.
//!
//! # Invariants
//! - Each save writes the complete list; there is no diff or log.
//! - Load never fails: a missing, unreadable or corrupt snapshot falls back to
//!   an empty item list or the default categories and is logged at `warn`.
//! - Records inside a readable snapshot are decoded one by one; an element
//!   that is not an object is skipped, the rest of the list survives.
//! - Snapshot contents (item text) are never logged.

mod kv;
pub mod transfer;

use crate::db::DbError;
use crate::model::category::{default_categories, Category};
use crate::model::item::Item;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};

/// Key of the JSON array of items.
pub const ITEMS_KEY: &str = "items-store";
/// Key of the JSON array of categories.
pub const CATEGORIES_KEY: &str = "categories-store";

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while reading or writing a snapshot.
#[derive(Debug)]
pub enum PersistError {
    /// SQLite backend failure.
    Db(DbError),
    /// Non-SQLite backend failure (e.g. an unavailable in-memory store).
    Backend(String),
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "key-value store unavailable: {message}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Both persisted lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub categories: Vec<Category>,
}

/// Loads both snapshots, masking any corruption with safe defaults.
pub fn load_snapshot(kv: &dyn KeyValueStore) -> Snapshot {
    let items = load_items(kv);
    let categories = load_categories(kv);
    info!(
        "event=snapshot_load module=persist status=ok items={} categories={}",
        items.len(),
        categories.len()
    );
    Snapshot { items, categories }
}

/// Loads `items-store`; falls back to an empty list.
pub fn load_items(kv: &dyn KeyValueStore) -> Vec<Item> {
    load_document(kv, ITEMS_KEY).unwrap_or_default()
}

/// Loads `categories-store`; falls back to the default categories.
pub fn load_categories(kv: &dyn KeyValueStore) -> Vec<Category> {
    load_document(kv, CATEGORIES_KEY).unwrap_or_else(default_categories)
}

/// Writes the full item list.
pub fn save_items(kv: &mut dyn KeyValueStore, items: &[Item]) -> PersistResult<()> {
    save_document(kv, ITEMS_KEY, items)
}

/// Writes the full category list.
pub fn save_categories(kv: &mut dyn KeyValueStore, categories: &[Category]) -> PersistResult<()> {
    save_document(kv, CATEGORIES_KEY, categories)
}

fn load_document<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<Vec<T>> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=snapshot_read module=persist status=missing key={key}");
            return None;
        }
        Err(err) => {
            warn!(
                "event=snapshot_read module=persist status=error key={key} error_code=kv_read_failed error={err}"
            );
            return None;
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(values)) => Some(decode_records(&values, key)),
        Ok(_) => {
            warn!(
                "event=snapshot_read module=persist status=error key={key} error_code=snapshot_not_a_list"
            );
            None
        }
        Err(err) => {
            // serde_json errors carry line/column only, not document content.
            warn!(
                "event=snapshot_read module=persist status=error key={key} error_code=snapshot_corrupt error={err}"
            );
            None
        }
    }
}

/// Decodes each element on its own, skipping the ones that do not fit.
pub(crate) fn decode_records<T: DeserializeOwned>(values: &[Value], source: &str) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match T::deserialize(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=record_decode module=persist status=skipped source={source} index={index} error={err}"
                );
                None
            }
        })
        .collect()
}

fn save_document<T: Serialize + ?Sized>(
    kv: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> PersistResult<()> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}
