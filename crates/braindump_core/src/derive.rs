//! Pure derived views over the record store.
//!
//! # Responsibility
//! - Group items by category and by board status.
//! - Filter items by term.
//! - Format human-readable relative capture times.
//!
//! # Invariants
//! - Every function is pure and recomputed by the caller; nothing is cached.
//! - Category buckets sort by priority desc (absent = 0), then `created_at`
//!   asc, then `id` asc, which is a total order.
//! - Items whose category is unknown land in `unassigned`, never dropped.

use crate::model::category::Category;
use crate::model::item::{Item, Status, Term};
use std::cmp::Ordering;
use std::collections::BTreeMap;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Items of one known category, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket<'a> {
    pub category: &'a Category,
    pub items: Vec<&'a Item>,
}

/// Result of [`group_by_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGrouping<'a> {
    /// One bucket per known category, in category-list order.
    pub buckets: Vec<CategoryBucket<'a>>,
    /// Items referencing a category id that no longer exists.
    pub unassigned: Vec<&'a Item>,
}

impl<'a> CategoryGrouping<'a> {
    /// Looks up the bucket of a known category.
    pub fn bucket(&self, category_id: &str) -> Option<&CategoryBucket<'a>> {
        self.buckets
            .iter()
            .find(|bucket| bucket.category.id == category_id)
    }

    /// Total number of grouped items, unassigned included.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.items.len())
            .sum::<usize>()
            + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ticket board with exactly one column per [`Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard<'a> {
    columns: BTreeMap<Status, Vec<&'a Item>>,
}

impl<'a> StatusBoard<'a> {
    pub fn column(&self, status: Status) -> &[&'a Item] {
        self.columns
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Columns in board order (backlog, in progress, blocked, done).
    pub fn columns(&self) -> impl Iterator<Item = (Status, &[&'a Item])> {
        self.columns
            .iter()
            .map(|(status, items)| (*status, items.as_slice()))
    }

    /// Item count per column, in board order.
    pub fn counts(&self) -> [(Status, usize); 4] {
        Status::ALL.map(|status| (status, self.column(status).len()))
    }
}

/// Term filter used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermFilter {
    #[default]
    All,
    Only(Term),
}

impl TermFilter {
    /// Parses a UI value; `"all"` and unknown values mean no filtering.
    pub fn parse(value: &str) -> Self {
        Term::parse(value).map_or(Self::All, Self::Only)
    }
}

/// Groups items by category and sorts every bucket.
pub fn group_by_category<'a>(items: &'a [Item], categories: &'a [Category]) -> CategoryGrouping<'a> {
    let mut buckets: Vec<CategoryBucket<'a>> = categories
        .iter()
        .map(|category| CategoryBucket {
            category,
            items: Vec::new(),
        })
        .collect();
    let mut unassigned = Vec::new();

    for item in items {
        match buckets
            .iter_mut()
            .find(|bucket| bucket.category.id == item.category_id)
        {
            Some(bucket) => bucket.items.push(item),
            None => unassigned.push(item),
        }
    }

    for bucket in &mut buckets {
        bucket.items.sort_by(|left, right| compare_for_display(left, right));
    }
    unassigned.sort_by(|left, right| compare_for_display(left, right));

    CategoryGrouping {
        buckets,
        unassigned,
    }
}

/// Display order inside a category bucket.
pub fn compare_for_display(left: &Item, right: &Item) -> Ordering {
    right
        .effective_priority()
        .cmp(&left.effective_priority())
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

/// Keeps items matching the filter, preserving input order.
pub fn filter_by_term(items: &[Item], filter: TermFilter) -> Vec<&Item> {
    match filter {
        TermFilter::All => items.iter().collect(),
        TermFilter::Only(term) => items.iter().filter(|item| item.term == Some(term)).collect(),
    }
}

/// Partitions items into the four board columns.
///
/// Items without a status are placed in the backlog column.
pub fn group_by_status(items: &[Item]) -> StatusBoard<'_> {
    let mut columns: BTreeMap<Status, Vec<&Item>> =
        Status::ALL.iter().map(|status| (*status, Vec::new())).collect();
    for item in items {
        columns
            .entry(item.effective_status())
            .or_default()
            .push(item);
    }
    StatusBoard { columns }
}

/// Formats the age of a capture: `just now`, `5m ago`, `3h ago`, `2d ago`.
///
/// Future timestamps (clock skew) are reported as `just now`.
pub fn format_relative_time(created_at_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(created_at_ms);
    if elapsed < MINUTE_MS {
        "just now".to_string()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else {
        format!("{}d ago", elapsed / DAY_MS)
    }
}
