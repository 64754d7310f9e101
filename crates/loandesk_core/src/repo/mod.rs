//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the collection store contract consumed by the service layer.
//! - Isolate SQLite and JSON encoding details from business rules.
//!
//! # Invariants
//! - Records are keyed by string id within a named collection.
//! - Preferences are stored apart from records.

pub mod record_repo;
pub mod settings_repo;
