//! In-memory application state mirrored from the record store.

use crate::model::activity::ActivityLog;
use crate::model::client::Client;
use crate::model::commitment::Commitment;
use crate::model::document::Document;
use crate::model::interaction::Interaction;
use crate::model::task::Task;
use crate::model::team::Team;
use crate::model::user::User;
use crate::repo::record_repo::Record;

/// Label used wherever a missing user must be rendered.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// All loaded collections.
///
/// `interactions` and `activity_logs` are kept newest first; the other
/// collections keep store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrmState {
    pub clients: Vec<Client>,
    pub tasks: Vec<Task>,
    pub interactions: Vec<Interaction>,
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub activity_logs: Vec<ActivityLog>,
    pub commitments: Vec<Commitment>,
    pub documents: Vec<Document>,
}

impl CrmState {
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.username.eq_ignore_ascii_case(username))
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub fn team_of(&self, user_id: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.includes(user_id))
    }

    pub fn commitment(&self, id: &str) -> Option<&Commitment> {
        self.commitments.iter().find(|commitment| commitment.id == id)
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    /// Display name for an optional user id.
    pub fn user_label(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.user(id))
            .map(|user| user.name.clone())
            .unwrap_or_else(|| UNASSIGNED_LABEL.to_string())
    }
}

/// Replaces the record with the same id in place, or appends it.
pub(crate) fn upsert_by_id<T: Record>(items: &mut Vec<T>, item: T) {
    match items
        .iter()
        .position(|existing| existing.record_id() == item.record_id())
    {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

pub(crate) fn remove_by_id<T: Record>(items: &mut Vec<T>, id: &str) {
    items.retain(|existing| existing.record_id() != id);
}
