//! Team handlers.
//!
//! # Invariants
//! - Every participant of a team is a known user.
//! - No user participates in two teams.

use crate::access::Permission;
use crate::model::activity::ActivityCategory;
use crate::model::new_id;
use crate::model::team::{NewTeam, Team};
use crate::repo::record_repo::{Collection, RecordStore};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::crm_service::CrmService;
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::{remove_by_id, upsert_by_id};

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    pub fn add_team(&mut self, input: NewTeam) -> CrmResult<Team> {
        self.require(Permission::ManageTeams)?;
        let team = Team {
            id: new_id("team"),
            name: input.name.trim().to_string(),
            team_lead_id: input.team_lead_id,
            member_ids: input.member_ids,
        };
        self.check_team(&team)?;

        self.store.add(&team)?;
        self.state.teams.push(team.clone());
        self.record_activity(
            ActivityCategory::Team,
            format!("created team {}", team.name),
            None,
        );
        Ok(team)
    }

    pub fn update_team(&mut self, team: Team) -> CrmResult<Team> {
        self.require(Permission::ManageTeams)?;
        if self.state.team(&team.id).is_none() {
            return Err(CrmError::not_found(Collection::Teams, &team.id));
        }
        self.check_team(&team)?;

        self.store.put(&team)?;
        upsert_by_id(&mut self.state.teams, team.clone());
        self.record_activity(
            ActivityCategory::Team,
            format!("updated team {}", team.name),
            None,
        );
        Ok(team)
    }

    pub fn delete_team(&mut self, id: &str) -> CrmResult<()> {
        self.require(Permission::ManageTeams)?;
        let team = self
            .state
            .team(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Teams, id))?;

        self.store.delete_item(Collection::Teams, id)?;
        remove_by_id(&mut self.state.teams, id);
        self.record_activity(
            ActivityCategory::Team,
            format!("deleted team {}", team.name),
            None,
        );
        Ok(())
    }

    fn check_team(&self, team: &Team) -> CrmResult<()> {
        team.validate()?;
        for user_id in team.participants() {
            if self.state.user(user_id).is_none() {
                return Err(CrmError::not_found(Collection::Users, user_id));
            }
            let other = self
                .state
                .teams
                .iter()
                .find(|existing| existing.id != team.id && existing.includes(user_id));
            if let Some(other) = other {
                return Err(CrmError::TeamMembershipConflict {
                    user_id: user_id.to_string(),
                    team_id: other.id.clone(),
                });
            }
        }
        Ok(())
    }
}
