//! Category domain model and slug derivation.
//!
//! # Invariants
//! - `id` is derived from the label via [`slugify`] and unique within a list.
//! - Default categories are returned in a stable order.

use crate::model::item::CategoryId;
use crate::model::lenient;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_ALNUM_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

const SLUG_SEPARATOR: &str = "-";

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("career", "Career"),
    ("social", "Social"),
    ("environment", "Environment"),
    ("finance", "Finance"),
    ("health", "Health"),
];

/// Grouping bucket for items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: CategoryId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
}

impl Category {
    /// Builds a category from a display label.
    ///
    /// Returns `None` when the label trims empty or slugs to nothing
    /// (e.g. `"!!!"`).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let id = slugify(label);
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id,
            label: label.to_string(),
        })
    }
}

/// Derives a slug: lowercase, runs of non-alphanumerics collapsed to `-`,
/// separators stripped from both ends.
pub fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    let replaced = NON_ALNUM_RUN_RE.replace_all(&lowered, SLUG_SEPARATOR);
    replaced.trim_matches('-').to_string()
}

/// Returns the five built-in categories restored on reset.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(id, label)| Category {
            id: (*id).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_categories, slugify, Category};

    #[test]
    fn slugify_collapses_runs_and_trims_separators() {
        assert_eq!(slugify("Health "), "health");
        assert_eq!(slugify("Side  Projects!"), "side-projects");
        assert_eq!(slugify("--Q3 / Q4 goals--"), "q3-q4-goals");
    }

    #[test]
    fn from_label_rejects_symbol_only_labels() {
        assert!(Category::from_label("   ").is_none());
        assert!(Category::from_label("!!!").is_none());
    }

    #[test]
    fn defaults_have_five_unique_ids() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0].id, "career");
        assert_eq!(defaults[4].label, "Health");
    }
}
