//! Client document metadata.
//!
//! Only metadata is stored. `url` points at a payload held outside the
//! record store and may not survive a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub client_id: String,
    pub file_name: String,
    pub file_type: String,
    pub size: u64,
    pub url: String,
    /// Password protecting the file itself, if the uploader set one.
    pub password: Option<String>,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub client_id: String,
    pub file_name: String,
    pub file_type: String,
    pub size: u64,
    pub url: String,
    pub password: Option<String>,
}
