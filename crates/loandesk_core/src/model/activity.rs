//! Activity log (audit trail) model.
//!
//! # Invariants
//! - Entries are append-only and never edited or deleted by the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Client,
    Task,
    Communication,
    Document,
    User,
    Team,
    Commitment,
    Session,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Client,
    Task,
}

/// Pointer from an audit entry to the record it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub entity_name: String,
}

impl EntityRef {
    pub fn client(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_type: EntityType::Client,
            entity_id: id.into(),
            entity_name: name.into(),
        }
    }

    pub fn task(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            entity_type: EntityType::Task,
            entity_id: id.into(),
            entity_name: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub category: ActivityCategory,
    pub entity: Option<EntityRef>,
}
