//! Capture item domain model.
//!
//! # Responsibility
//! - Define the canonical record produced by the capture flow.
//! - Own the closed enums for term, status and the clamped priority value.
//!
//! # Invariants
//! - `id` is unique at creation time and never reused.
//! - `text` is trimmed and non-empty for items created by the store.
//! - `priority` always holds a value in `0..=5`.
//! - Absent optional fields are omitted on the wire, never written as `""`.
//! - Decoding never rejects an object: missing or malformed fields fall back
//!   to defaults, unknown `term`/`status` values decode as absent.

use crate::model::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque item identifier.
///
/// Generated items use UUID v4 text; imported items may carry any string.
pub type ItemId = String;

/// Category identifier (slug) referenced by an item.
pub type CategoryId = String;

/// Time-horizon classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Short,
    Medium,
    Long,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Short, Term::Medium, Term::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            Term::Short => "short",
            Term::Medium => "medium",
            Term::Long => "long",
        }
    }

    /// Parses a wire/UI value. Empty input means "no term" and yields `None`.
    pub fn parse(value: &str) -> Option<Term> {
        match value.trim() {
            "short" => Some(Term::Short),
            "medium" => Some(Term::Medium),
            "long" => Some(Term::Long),
            _ => None,
        }
    }
}

/// Workflow stage of an item on the ticket board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Captured but not started.
    Backlog,
    /// Work is in progress.
    InProgress,
    /// Waiting on something external.
    Blocked,
    /// Completed.
    Done,
}

impl Status {
    /// Board column order.
    pub const ALL: [Status; 4] = [
        Status::Backlog,
        Status::InProgress,
        Status::Blocked,
        Status::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
        }
    }
}

/// Item priority clamped to `0..=5`.
///
/// Serialized as a bare integer. Out-of-range input (including persisted or
/// imported data) is clamped instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    /// Builds a priority, clamping the value into `0..=5`.
    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

/// Canonical capture record.
///
/// Wire shape matches the `items-store` snapshot and the export document:
/// camelCase keys, optional fields omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default = "generate_id", deserialize_with = "decode_id")]
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_id: CategoryId,
    /// Unix epoch milliseconds.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub created_at: i64,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub term: Option<Term>,
    #[serde(
        default,
        deserialize_with = "decode_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Status>,
}

impl Item {
    /// Creates a backlog item with a generated id.
    ///
    /// Returns `None` when `text` trims to empty.
    pub fn new(
        text: &str,
        category_id: impl Into<CategoryId>,
        created_at: i64,
    ) -> Option<Self> {
        Self::with_id(generate_id(), text, category_id, created_at)
    }

    /// Creates a backlog item with a caller-provided id.
    ///
    /// Returns `None` when `text` trims to empty.
    pub fn with_id(
        id: impl Into<ItemId>,
        text: &str,
        category_id: impl Into<CategoryId>,
        created_at: i64,
    ) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            id: id.into(),
            text: text.to_string(),
            category_id: category_id.into(),
            created_at,
            term: None,
            priority: None,
            status: Some(Status::Backlog),
        })
    }

    /// Priority used for ordering; absent counts as zero.
    pub fn effective_priority(&self) -> u8 {
        self.priority.map_or(0, Priority::value)
    }

    /// Board column; absent status counts as backlog.
    pub fn effective_status(&self) -> Status {
        self.status.unwrap_or(Status::Backlog)
    }
}

fn generate_id() -> ItemId {
    Uuid::new_v4().to_string()
}

// A record without a usable id still needs one to be patched or removed.
fn decode_id<'de, D>(deserializer: D) -> Result<ItemId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient::string_from(value)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(generate_id))
}

fn decode_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient::integer_from(&value).map(Priority::new))
}
