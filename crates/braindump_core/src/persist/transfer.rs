//! Export/import document format.
//!
//! # Responsibility
//! - Render the store as `{ items, categories, exportedAt }`.
//! - Parse an import document and validate its top-level shape.
//!
//! # Invariants
//! - Import requires `items` and `categories` to be present as arrays.
//! - Elements are not validated: unknown keys are ignored, malformed fields
//!   take their defaults, and an element that is not an object is skipped.
//! - `exportedAt` is written on export and ignored on import.

use super::{decode_records, PersistResult, Snapshot};
use crate::model::category::Category;
use crate::model::item::Item;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXPORT_FILE_PREFIX: &str = "braindump";

/// Serialized export document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub items: &'a [Item],
    pub categories: &'a [Category],
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub exported_at: String,
}

impl<'a> ExportDocument<'a> {
    pub fn new(items: &'a [Item], categories: &'a [Category], now_ms: i64) -> Self {
        Self {
            items,
            categories,
            exported_at: iso_timestamp(now_ms),
        }
    }

    /// Pretty-printed JSON suitable for a downloadable file.
    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Import failure surfaced to the user. State is never mutated on error.
#[derive(Debug)]
pub enum ImportError {
    /// Input is not valid JSON.
    Parse(serde_json::Error),
    /// Top-level value is not an object.
    NotAnObject,
    /// Required top-level field is missing or not an array.
    Shape { field: &'static str },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "import file is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "import file must contain a JSON object"),
            Self::Shape { field } => {
                write!(f, "import file must contain `{field}` as a list")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Parses an import document into a snapshot.
///
/// Both top-level arrays are checked before any element is decoded.
pub fn parse_import(input: &str) -> Result<Snapshot, ImportError> {
    let document: Value = serde_json::from_str(input)?;
    let object = document.as_object().ok_or(ImportError::NotAnObject)?;

    let raw_items = required_array(object, "items")?;
    let raw_categories = required_array(object, "categories")?;

    Ok(Snapshot {
        items: decode_records(raw_items, "import.items"),
        categories: decode_records(raw_categories, "import.categories"),
    })
}

/// Suggested download name, e.g. `braindump-2026-10-17.json`.
pub fn export_file_name(now_ms: i64) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}-{}.json",
        utc_from_millis(now_ms).format("%Y-%m-%d")
    )
}

fn required_array<'v>(
    object: &'v serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'v Vec<Value>, ImportError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or(ImportError::Shape { field })
}

fn iso_timestamp(now_ms: i64) -> String {
    utc_from_millis(now_ms).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn utc_from_millis(now_ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(now_ms).unwrap_or_default()
}
