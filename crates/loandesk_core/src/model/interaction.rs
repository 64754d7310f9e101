//! Interaction domain model.
//!
//! # Invariants
//! - Interactions are append-only; no update path exists.
//! - `timestamp` is assigned at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionType {
    Call,
    Email,
    WhatsApp,
    Meeting,
    Note,
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::WhatsApp => "WhatsApp message",
            Self::Meeting => "meeting",
            Self::Note => "note",
        };
        f.write_str(label)
    }
}

/// Record of one communication event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub client_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub subject: Option<String>,
    pub notes: String,
    pub attachments: Vec<String>,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Caller input for logging one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteraction {
    pub client_id: Option<String>,
    pub kind: InteractionType,
    pub subject: Option<String>,
    pub notes: String,
    pub attachments: Vec<String>,
}

/// Caller input for one bulk email send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEmail {
    pub client_ids: Vec<String>,
    pub subject: String,
    pub message: String,
    pub attachments: Vec<String>,
}
