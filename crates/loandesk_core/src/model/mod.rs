//! Domain model for the loan pipeline CRM.
//!
//! # Responsibility
//! - Define canonical records persisted by the record store.
//! - Keep wire naming (camelCase fields, display-style enum names) stable so
//!   stored documents survive upgrades.
//!
//! # Invariants
//! - Every record is identified by a stable string id that is never reused.
//! - Interactions live only in their own collection; clients never embed them.

use uuid::Uuid;

pub mod activity;
pub mod client;
pub mod commitment;
pub mod document;
pub mod interaction;
pub mod task;
pub mod team;
pub mod user;
pub mod validation;

/// Generates a new record id of the form `<prefix>-<uuid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
