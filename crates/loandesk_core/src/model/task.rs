//! Task domain model.

use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// Follow-up work item, optionally linked to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `None` for client-independent tasks.
    pub client_id: Option<String>,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
    pub created_by: String,
}

/// Caller input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.id, "task id")?;
        require_text(&self.title, "task title")
    }

    /// Returns whether the task belongs to the given user's worklist.
    ///
    /// Unassigned tasks belong to their creator.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        match self.assigned_to.as_deref() {
            Some(assignee) => assignee == user_id,
            None => self.created_by == user_id,
        }
    }
}
