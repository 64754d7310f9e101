//! User administration handlers.

use crate::access::Permission;
use crate::credentials::hash_password;
use crate::model::activity::ActivityCategory;
use crate::model::client::Client;
use crate::model::new_id;
use crate::model::team::Team;
use crate::model::user::{NewUser, User, UserStatus};
use crate::model::validation::{require_text, ValidationError};
use crate::repo::record_repo::{Collection, RecordStore};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::audit::user_changes;
use crate::service::crm_service::CrmService;
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::{remove_by_id, upsert_by_id};
use log::info;

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    pub fn add_user(&mut self, input: NewUser) -> CrmResult<User> {
        self.require(Permission::ManageUsers)?;
        require_text(&input.password, "password")?;

        let mut user = User {
            id: new_id("user"),
            name: input.name.trim().to_string(),
            email: input.email,
            username: input.username.trim().to_string(),
            password_hash: String::new(),
            role: input.role,
            status: UserStatus::Active,
            shift_start_time: input.shift_start_time,
            shift_end_time: input.shift_end_time,
        };
        user.validate()?;
        self.ensure_username_free(&user)?;
        user.password_hash = hash_password(&input.password, self.config.password_hash_cost)?;

        self.store.add(&user)?;
        self.state.users.push(user.clone());
        self.record_activity(
            ActivityCategory::User,
            format!("added user {} ({})", user.name, user.role),
            None,
        );
        Ok(user)
    }

    /// Replaces a user's profile.
    ///
    /// The stored password hash is kept; use [`Self::change_password`] to
    /// rotate it. An invalid shift window is rejected before any write.
    pub fn update_user(&mut self, mut user: User) -> CrmResult<User> {
        self.require(Permission::ManageUsers)?;
        user.validate()?;
        let prev = self
            .state
            .user(&user.id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Users, &user.id))?;
        self.ensure_username_free(&user)?;
        user.password_hash = prev.password_hash.clone();

        self.store.put(&user)?;
        upsert_by_id(&mut self.state.users, user.clone());
        self.session.refresh_user(&user);

        let changes = user_changes(&prev, &user);
        if !changes.is_empty() {
            self.record_activity(
                ActivityCategory::User,
                format!("updated user {}: {}", user.name, changes.join("; ")),
                None,
            );
        }
        Ok(user)
    }

    /// Sets a new password. Users may change their own; changing someone
    /// else's needs user management rights.
    pub fn change_password(&mut self, user_id: &str, new_password: &str) -> CrmResult<()> {
        let actor = self
            .session
            .current_user()
            .cloned()
            .ok_or(CrmError::NotLoggedIn)?;
        if actor.id != user_id {
            self.require(Permission::ManageUsers)?;
        }
        require_text(new_password, "password")?;
        let mut user = self
            .state
            .user(user_id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Users, user_id))?;

        user.password_hash = hash_password(new_password, self.config.password_hash_cost)?;
        self.store.put(&user)?;
        upsert_by_id(&mut self.state.users, user.clone());
        self.session.refresh_user(&user);
        self.record_activity(
            ActivityCategory::User,
            format!("changed password for {}", user.name),
            None,
        );
        Ok(())
    }

    /// Deletes a user after unassigning their clients and pruning them from
    /// every team.
    ///
    /// Returns the number of clients that became unassigned. The signed-in
    /// account cannot delete itself.
    pub fn delete_user(&mut self, id: &str) -> CrmResult<usize> {
        let actor = self.require(Permission::ManageUsers)?;
        if actor.id == id {
            return Err(CrmError::SelfDeletion);
        }
        let user = self
            .state
            .user(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Users, id))?;

        let unassigned: Vec<Client> = self
            .state
            .clients
            .iter()
            .filter(|client| client.is_assigned_to(id))
            .map(|client| Client {
                assigned_to: None,
                ..client.clone()
            })
            .collect();
        let unassigned_count = unassigned.len();
        if unassigned_count > 0 {
            self.store.bulk_put(&unassigned)?;
            for client in unassigned {
                upsert_by_id(&mut self.state.clients, client);
            }
            self.record_activity(
                ActivityCategory::Client,
                format!("unassigned {unassigned_count} clients from {}", user.name),
                None,
            );
        }

        let pruned: Vec<Team> = self
            .state
            .teams
            .iter()
            .filter(|team| team.includes(id))
            .map(|team| {
                let mut team = team.clone();
                if team.team_lead_id.as_deref() == Some(id) {
                    team.team_lead_id = None;
                }
                team.member_ids.retain(|member| member != id);
                team
            })
            .collect();
        if !pruned.is_empty() {
            self.store.bulk_put(&pruned)?;
            for team in pruned {
                upsert_by_id(&mut self.state.teams, team);
            }
        }

        self.store.delete_item(Collection::Users, id)?;
        remove_by_id(&mut self.state.users, id);
        info!(
            "event=user_delete module=service status=ok unassigned_clients={}",
            unassigned_count
        );
        self.record_activity(
            ActivityCategory::User,
            format!("deleted user {}", user.name),
            None,
        );
        Ok(unassigned_count)
    }

    fn ensure_username_free(&self, user: &User) -> CrmResult<()> {
        match self.state.user_by_username(&user.username) {
            Some(existing) if existing.id != user.id => Err(CrmError::Validation(
                ValidationError::DuplicateUsername(user.username.clone()),
            )),
            _ => Ok(()),
        }
    }
}
