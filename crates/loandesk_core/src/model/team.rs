//! Team domain model.
//!
//! # Invariants
//! - A user belongs to at most one team, as lead or member. Enforced by the
//!   service on every team write.

use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// `None` after the lead's account is deleted.
    pub team_lead_id: Option<String>,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub team_lead_id: Option<String>,
    pub member_ids: Vec<String>,
}

impl Team {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.id, "team id")?;
        require_text(&self.name, "team name")
    }

    /// Lead and members, lead first, without duplicates.
    pub fn participants(&self) -> Vec<&str> {
        let mut participants: Vec<&str> = Vec::with_capacity(self.member_ids.len() + 1);
        if let Some(lead) = self.team_lead_id.as_deref() {
            participants.push(lead);
        }
        for member in &self.member_ids {
            if !participants.contains(&member.as_str()) {
                participants.push(member.as_str());
            }
        }
        participants
    }

    pub fn includes(&self, user_id: &str) -> bool {
        self.team_lead_id.as_deref() == Some(user_id)
            || self.member_ids.iter().any(|member| member == user_id)
    }
}
