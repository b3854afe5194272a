//! Core use-case services.
//!
//! # Responsibility
//! - Wire the record store to its persistence backend.
//! - Keep presentation layers decoupled from storage details.

pub mod capture_service;
