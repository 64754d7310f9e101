//! Commitment (collection target) model.
//!
//! Amounts are progressed manually by report reviewers; nothing updates
//! `current_amount` automatically.

use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub id: String,
    pub title: String,
    pub user_id: Option<String>,
    pub target_amount: u64,
    pub current_amount: u64,
    pub due_date: NaiveDate,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommitment {
    pub title: String,
    pub user_id: Option<String>,
    pub target_amount: u64,
    pub due_date: NaiveDate,
}

impl Commitment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.id, "commitment id")?;
        require_text(&self.title, "commitment title")?;
        if self.target_amount == 0 {
            return Err(ValidationError::ZeroCommitmentTarget);
        }
        Ok(())
    }

    /// Progress toward target in whole percent, capped at 100.
    pub fn progress_percent(&self) -> u8 {
        if self.target_amount == 0 {
            return 0;
        }
        let percent = self.current_amount.saturating_mul(100) / self.target_amount;
        percent.min(100) as u8
    }
}
