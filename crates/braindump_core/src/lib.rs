//! Core domain logic for Braindump, a personal task-capture tool.
//! This crate is the single source of truth for capture invariants.

pub mod config;
pub mod db;
pub mod derive;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use derive::{
    compare_for_display, filter_by_term, format_relative_time, group_by_category,
    group_by_status, CategoryBucket, CategoryGrouping, StatusBoard, TermFilter,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{default_categories, slugify, Category};
pub use model::item::{CategoryId, Item, ItemId, Priority, Status, Term};
pub use persist::transfer::{export_file_name, parse_import, ExportDocument, ImportError};
pub use persist::{
    load_snapshot, KeyValueStore, MemoryKvStore, PersistError, PersistResult, Snapshot,
    SqliteKvStore, CATEGORIES_KEY, ITEMS_KEY,
};
pub use service::capture_service::{
    CaptureOptions, CaptureService, ImportSummary, ServiceError, ServiceResult,
};
pub use store::clock::{Clock, ManualClock, SystemClock};
pub use store::command::ItemCommand;
pub use store::observer::{StoreChange, SubscriptionId};
pub use store::{CategoryRemoval, RecordStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
