//! Domain model for captured items and their categories.
//!
//! # Responsibility
//! - Define canonical data structures shared by store, derivations and
//!   persistence.
//! - Keep one wire shape for the key-value snapshots and the export document.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Item `category_id` may dangle; the model does not enforce referential
//!   integrity.

pub mod category;
pub mod item;
mod lenient;
