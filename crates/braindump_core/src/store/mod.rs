//! In-memory record store for items and categories.
//!
//! # Responsibility
//! - Own both lists exclusively and apply every mutation.
//! - Notify registered listeners after each successful mutation.
//!
//! # Invariants
//! - Items are kept most-recent-first.
//! - Invalid arguments (blank text, duplicate slug, unknown ids) are no-ops and
//!   never notify listeners.
//! - `created_at` of newly captured items is strictly increasing.

pub mod clock;
pub mod command;
pub mod observer;

use crate::model::category::{default_categories, Category};
use crate::model::item::{CategoryId, Item};
use clock::{Clock, SystemClock};
use command::{dispatch, ItemCommand};
use observer::{ListenerRegistry, StoreChange, SubscriptionId};

/// Outcome of a category removal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRemoval {
    /// No category with that id exists.
    NotFound,
    /// The category still owns items and removal was not confirmed.
    NeedsConfirmation { item_count: usize },
    /// The category was removed.
    ///
    /// `target` is the category the items moved to, `None` when the list
    /// became empty and the items were left dangling.
    Removed {
        rehomed: usize,
        target: Option<CategoryId>,
    },
}

/// Explicit store object handed to every consumer.
pub struct RecordStore {
    items: Vec<Item>,
    categories: Vec<Category>,
    clock: Box<dyn Clock>,
    last_created_at: i64,
    listeners: ListenerRegistry,
}

impl RecordStore {
    /// Creates a store over existing lists using the system clock.
    pub fn new(items: Vec<Item>, categories: Vec<Category>) -> Self {
        Self::with_clock(items, categories, Box::new(SystemClock))
    }

    /// Creates an empty store seeded with the default categories.
    pub fn with_defaults() -> Self {
        Self::new(Vec::new(), default_categories())
    }

    /// Creates a store with a caller-provided clock.
    pub fn with_clock(items: Vec<Item>, categories: Vec<Category>, clock: Box<dyn Clock>) -> Self {
        let last_created_at = latest_created_at(&items);
        Self {
            items,
            categories,
            clock,
            last_created_at,
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Number of items referencing `category_id`.
    pub fn category_usage(&self, category_id: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.category_id == category_id)
            .count()
    }

    /// Captures one item at the front of the list.
    ///
    /// Returns `None` without notifying when `text` trims to empty.
    pub fn add_item(&mut self, text: &str, category_id: &str) -> Option<Item> {
        let item = self.insert_item(text, category_id)?;
        self.listeners.notify(StoreChange::Items);
        Some(item)
    }

    /// Captures one item per non-blank line, in input order.
    ///
    /// Listeners are notified once for the whole batch.
    pub fn add_items_bulk(&mut self, lines: &str, category_id: &str) -> Vec<Item> {
        let created: Vec<Item> = lines
            .lines()
            .filter_map(|line| self.insert_item(line, category_id))
            .collect();
        if !created.is_empty() {
            self.listeners.notify(StoreChange::Items);
        }
        created
    }

    /// Applies typed commands to one item.
    ///
    /// Returns `true` when the item exists and at least one field changed.
    pub fn patch_item(&mut self, id: &str, commands: &[ItemCommand]) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        let changed = dispatch(item, commands);
        if changed {
            self.listeners.notify(StoreChange::Items);
        }
        changed
    }

    /// Removes one item. Returns `false` when `id` is unknown.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.listeners.notify(StoreChange::Items);
        }
        removed
    }

    /// Adds a category derived from `label`.
    ///
    /// Returns `None` for blank labels and for slugs that already exist
    /// (`"Health"` and `"health "` collide).
    pub fn add_category(&mut self, label: &str) -> Option<Category> {
        let category = Category::from_label(label)?;
        if self.category(&category.id).is_some() {
            return None;
        }
        self.categories.push(category.clone());
        self.listeners.notify(StoreChange::Categories);
        Some(category)
    }

    /// Removes a category, re-homing its items to the first remaining one.
    ///
    /// A category that still owns items is only removed when `confirmed` is
    /// set; otherwise nothing changes.
    pub fn remove_category(&mut self, id: &str, confirmed: bool) -> CategoryRemoval {
        let Some(position) = self.categories.iter().position(|category| category.id == id) else {
            return CategoryRemoval::NotFound;
        };

        let item_count = self.category_usage(id);
        if item_count > 0 && !confirmed {
            return CategoryRemoval::NeedsConfirmation { item_count };
        }

        self.categories.remove(position);
        let target = self.categories.first().map(|category| category.id.clone());
        let mut rehomed = 0;
        if let Some(target_id) = &target {
            for item in self.items.iter_mut().filter(|item| item.category_id == id) {
                item.category_id = target_id.clone();
                rehomed += 1;
            }
        }

        let change = if rehomed > 0 {
            StoreChange::All
        } else {
            StoreChange::Categories
        };
        self.listeners.notify(change);
        CategoryRemoval::Removed { rehomed, target }
    }

    /// Restores the five default categories. Items are left untouched.
    pub fn reset_categories(&mut self) {
        self.categories = default_categories();
        self.listeners.notify(StoreChange::Categories);
    }

    /// Empties both lists.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.categories.clear();
        self.listeners.notify(StoreChange::All);
    }

    /// Wholesale replacement used by import.
    pub fn replace_all(&mut self, items: Vec<Item>, categories: Vec<Category>) {
        self.last_created_at = self.last_created_at.max(latest_created_at(&items));
        self.items = items;
        self.categories = categories;
        self.listeners.notify(StoreChange::All);
    }

    /// Registers a listener called after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Removes a listener. Returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn insert_item(&mut self, text: &str, category_id: &str) -> Option<Item> {
        let created_at = self.next_created_at();
        let item = Item::new(text, category_id, created_at)?;
        self.last_created_at = created_at;
        self.items.insert(0, item.clone());
        Some(item)
    }

    fn next_created_at(&self) -> i64 {
        let now = self.clock.now_ms();
        if now > self.last_created_at {
            now
        } else {
            self.last_created_at.saturating_add(1)
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("items", &self.items.len())
            .field("categories", &self.categories.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

fn latest_created_at(items: &[Item]) -> i64 {
    items.iter().map(|item| item.created_at).max().unwrap_or(i64::MIN)
}
