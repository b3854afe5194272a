//! Typed item mutation commands and their dispatcher.
//!
//! # Responsibility
//! - Replace free-form partial merges with a closed set of edits.
//! - Keep "unset" explicit (`None`) instead of sentinel empty strings.
//!
//! # Invariants
//! - A command never leaves `text` empty.
//! - `apply` reports whether the item actually changed.

use crate::model::item::{CategoryId, Item, Priority, Status, Term};

/// One field edit on an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    /// `None` clears the term.
    SetTerm(Option<Term>),
    /// `None` clears the priority.
    SetPriority(Option<Priority>),
    /// `None` clears the status (derived views treat it as backlog).
    SetStatus(Option<Status>),
    /// Replaces the text; blank input is ignored.
    SetText(String),
    /// Moves the item to another category.
    SetCategory(CategoryId),
}

impl ItemCommand {
    /// Applies this command to `item`. Returns `true` when a field changed.
    pub fn apply(&self, item: &mut Item) -> bool {
        match self {
            Self::SetTerm(term) => replace_if_changed(&mut item.term, *term),
            Self::SetPriority(priority) => replace_if_changed(&mut item.priority, *priority),
            Self::SetStatus(status) => replace_if_changed(&mut item.status, *status),
            Self::SetText(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed == item.text {
                    return false;
                }
                item.text = trimmed.to_string();
                true
            }
            Self::SetCategory(category_id) => {
                replace_if_changed(&mut item.category_id, category_id.clone())
            }
        }
    }
}

/// Applies commands in order and reports whether anything changed.
pub fn dispatch<'a>(item: &mut Item, commands: impl IntoIterator<Item = &'a ItemCommand>) -> bool {
    let mut changed = false;
    for command in commands {
        changed |= command.apply(item);
    }
    changed
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
