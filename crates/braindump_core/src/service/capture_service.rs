//! Capture session service.
//!
//! # Responsibility
//! - Load the record store from a key-value backend on `open`.
//! - Write the affected snapshot(s) through after every successful mutation.
//! - Provide export/import entry points and an explicit `flush`/`close`.
//!
//! # Invariants
//! - The service is the only writer of both snapshots.
//! - A failed write keeps the in-memory change and leaves the snapshot marked
//!   dirty; the next mutation or `flush` retries it.
//! - A failed import never mutates the store.

use crate::config::CoreConfig;
use crate::db::{open_db, DbError};
use crate::model::category::Category;
use crate::model::item::Item;
use crate::persist::transfer::{export_file_name, parse_import, ExportDocument, ImportError};
use crate::persist::{
    load_snapshot, save_categories, save_items, KeyValueStore, PersistError, SqliteKvStore,
};
use crate::store::clock::{Clock, SystemClock};
use crate::store::command::ItemCommand;
use crate::store::observer::{StoreChange, SubscriptionId};
use crate::store::{CategoryRemoval, RecordStore};
use log::{debug, info, warn};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error for persistence, import and file access.
#[derive(Debug)]
pub enum ServiceError {
    Persist(PersistError),
    Import(ImportError),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "`{}`: {source}", path.display()),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<PersistError> for ServiceError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Persist(PersistError::Db(value))
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Session behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Restore the default categories after `clear_all`.
    pub reseed_categories_on_clear: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            reseed_categories_on_clear: true,
        }
    }
}

impl From<&CoreConfig> for CaptureOptions {
    fn from(config: &CoreConfig) -> Self {
        Self {
            reseed_categories_on_clear: config.reseed_categories_on_clear,
        }
    }
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub items: usize,
    pub categories: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct DirtySnapshots {
    items: bool,
    categories: bool,
}

/// Capture session: record store plus its write-through backend.
pub struct CaptureService<K: KeyValueStore> {
    store: RecordStore,
    kv: K,
    options: CaptureOptions,
    dirty: Rc<Cell<DirtySnapshots>>,
    dirty_subscription: SubscriptionId,
}

impl CaptureService<SqliteKvStore> {
    /// Opens the SQLite snapshot database described by `config`.
    pub fn open_sqlite(config: &CoreConfig) -> ServiceResult<Self> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ServiceError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let conn = open_db(config.db_path())?;
        Ok(Self::open_with(
            SqliteKvStore::new(conn),
            CaptureOptions::from(config),
            Box::new(SystemClock),
        ))
    }
}

impl<K: KeyValueStore> CaptureService<K> {
    /// Loads both snapshots with default options and the system clock.
    pub fn open(kv: K) -> Self {
        Self::open_with(kv, CaptureOptions::default(), Box::new(SystemClock))
    }

    /// Loads both snapshots. Corrupt or missing snapshots load as defaults.
    pub fn open_with(kv: K, options: CaptureOptions, clock: Box<dyn Clock>) -> Self {
        let snapshot = load_snapshot(&kv);
        let mut store = RecordStore::with_clock(snapshot.items, snapshot.categories, clock);

        let dirty = Rc::new(Cell::new(DirtySnapshots::default()));
        let listener_dirty = Rc::clone(&dirty);
        let dirty_subscription = store.subscribe(move |change: StoreChange| {
            debug!(
                "event=store_change module=service status=ok change={}",
                change.as_str()
            );
            let mut state = listener_dirty.get();
            state.items |= change.touches_items();
            state.categories |= change.touches_categories();
            listener_dirty.set(state);
        });

        info!(
            "event=session_open module=service status=ok items={} categories={}",
            store.items().len(),
            store.categories().len()
        );

        Self {
            store,
            kv,
            options,
            dirty,
            dirty_subscription,
        }
    }

    /// Read access for derivations and rendering.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    pub fn categories(&self) -> &[Category] {
        self.store.categories()
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Registers a change listener on the underlying store.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Removes a listener. The internal write-through listener cannot be removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if id == self.dirty_subscription {
            return false;
        }
        self.store.unsubscribe(id)
    }

    pub fn add_item(&mut self, text: &str, category_id: &str) -> ServiceResult<Option<Item>> {
        let created = self.store.add_item(text, category_id);
        if created.is_some() {
            debug!("event=item_add module=service status=ok count=1");
        }
        self.write_through()?;
        Ok(created)
    }

    pub fn add_items_bulk(&mut self, lines: &str, category_id: &str) -> ServiceResult<Vec<Item>> {
        let created = self.store.add_items_bulk(lines, category_id);
        if !created.is_empty() {
            debug!(
                "event=item_add module=service status=ok count={}",
                created.len()
            );
        }
        self.write_through()?;
        Ok(created)
    }

    pub fn patch_item(&mut self, id: &str, commands: &[ItemCommand]) -> ServiceResult<bool> {
        let changed = self.store.patch_item(id, commands);
        self.write_through()?;
        Ok(changed)
    }

    pub fn remove_item(&mut self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.remove_item(id);
        self.write_through()?;
        Ok(removed)
    }

    pub fn add_category(&mut self, label: &str) -> ServiceResult<Option<Category>> {
        let added = self.store.add_category(label);
        self.write_through()?;
        Ok(added)
    }

    /// See [`RecordStore::remove_category`]; `confirmed` carries the user's
    /// answer to the destructive-action prompt.
    pub fn remove_category(&mut self, id: &str, confirmed: bool) -> ServiceResult<CategoryRemoval> {
        let outcome = self.store.remove_category(id, confirmed);
        if let CategoryRemoval::Removed { rehomed, .. } = &outcome {
            info!("event=category_remove module=service status=ok rehomed={rehomed}");
        }
        self.write_through()?;
        Ok(outcome)
    }

    pub fn reset_categories(&mut self) -> ServiceResult<()> {
        self.store.reset_categories();
        self.write_through()
    }

    /// Empties both lists, then re-seeds defaults when configured to.
    pub fn clear_all(&mut self) -> ServiceResult<()> {
        self.store.clear_all();
        if self.options.reseed_categories_on_clear {
            self.store.reset_categories();
        }
        info!(
            "event=store_clear module=service status=ok reseeded={}",
            self.options.reseed_categories_on_clear
        );
        self.write_through()
    }

    /// Renders the export document for the current state.
    pub fn export_json(&self) -> ServiceResult<String> {
        let document =
            ExportDocument::new(self.store.items(), self.store.categories(), self.store.now_ms());
        Ok(document.to_json()?)
    }

    /// Suggested file name for a download of [`Self::export_json`].
    pub fn export_file_name(&self) -> String {
        export_file_name(self.store.now_ms())
    }

    /// Writes the export document into `dir` and returns the file path.
    pub fn export_to_dir(&self, dir: &Path) -> ServiceResult<PathBuf> {
        let path = dir.join(self.export_file_name());
        let json = self.export_json()?;
        std::fs::write(&path, json).map_err(|source| ServiceError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=export module=service status=ok items={} categories={}",
            self.store.items().len(),
            self.store.categories().len()
        );
        Ok(path)
    }

    /// Replaces the whole store with the document's contents.
    ///
    /// No merge and no dedup against existing data. On error the store is
    /// left untouched.
    pub fn import_json(&mut self, input: &str) -> ServiceResult<ImportSummary> {
        let snapshot = match parse_import(input) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("event=import module=service status=error error={err}");
                return Err(err.into());
            }
        };

        let summary = ImportSummary {
            items: snapshot.items.len(),
            categories: snapshot.categories.len(),
        };
        self.store.replace_all(snapshot.items, snapshot.categories);
        info!(
            "event=import module=service status=ok items={} categories={}",
            summary.items, summary.categories
        );
        self.write_through()?;
        Ok(summary)
    }

    /// Reads `path` completely, then imports it.
    pub fn import_from_path(&mut self, path: &Path) -> ServiceResult<ImportSummary> {
        let input = std::fs::read_to_string(path).map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_json(&input)
    }

    /// Looks up an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.store.item(id)
    }

    /// Writes both snapshots unconditionally.
    pub fn flush(&mut self) -> ServiceResult<()> {
        self.dirty.set(DirtySnapshots {
            items: true,
            categories: true,
        });
        self.write_through()
    }

    /// Flushes and hands the backend back to the caller.
    pub fn close(mut self) -> ServiceResult<K> {
        self.flush()?;
        info!("event=session_close module=service status=ok");
        Ok(self.kv)
    }

    fn write_through(&mut self) -> ServiceResult<()> {
        let mut dirty = self.dirty.get();

        if dirty.items {
            if let Err(err) = save_items(&mut self.kv, self.store.items()) {
                warn!("event=snapshot_write module=service status=error key=items error={err}");
                return Err(err.into());
            }
            dirty.items = false;
            self.dirty.set(dirty);
        }

        if dirty.categories {
            if let Err(err) = save_categories(&mut self.kv, self.store.categories()) {
                warn!(
                    "event=snapshot_write module=service status=error key=categories error={err}"
                );
                return Err(err.into());
            }
            dirty.categories = false;
            self.dirty.set(dirty);
        }

        Ok(())
    }
}

impl<K: KeyValueStore> std::fmt::Debug for CaptureService<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureService")
            .field("store", &self.store)
            .field("options", &self.options)
            .finish()
    }
}
