//! Role-scoped read models.

use crate::access::Permission;
use crate::model::activity::ActivityLog;
use crate::model::client::{Client, ClientStatus};
use crate::model::task::Task;
use crate::model::user::{Role, User};
use crate::repo::record_repo::RecordStore;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::crm_service::CrmService;
use crate::service::error::CrmResult;
use crate::service::state::CrmState;

/// Pipeline totals over the clients visible to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Client count per status, in pipeline order.
    pub by_status: Vec<(ClientStatus, usize)>,
    pub total_clients: usize,
    pub requested_amount: u64,
    pub approved_amount: u64,
    pub disbursed_amount: u64,
}

impl PipelineSummary {
    pub fn count(&self, status: ClientStatus) -> usize {
        self.by_status
            .iter()
            .find(|(candidate, _)| *candidate == status)
            .map_or(0, |(_, count)| *count)
    }
}

/// Ids of users whose records `viewer` may see, or `None` for everything.
fn visible_owners<'a>(state: &'a CrmState, viewer: &'a User) -> Option<Vec<&'a str>> {
    match viewer.role {
        Role::Admin | Role::SubAdmin => None,
        Role::TeamLead => Some(
            state
                .teams
                .iter()
                .filter(|team| team.team_lead_id.as_deref() == Some(viewer.id.as_str()))
                .flat_map(|team| team.participants())
                .chain(std::iter::once(viewer.id.as_str()))
                .collect(),
        ),
        Role::Agent | Role::Trainee => Some(vec![viewer.id.as_str()]),
    }
}

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Clients the signed-in user may see.
    ///
    /// Admins see everything. Team leads see their team's clients, agents
    /// and trainees see clients assigned to or created by them.
    pub fn visible_clients(&self) -> CrmResult<Vec<&Client>> {
        let viewer = self.require(Permission::ViewClients)?;
        let owners = visible_owners(&self.state, &viewer);
        Ok(self
            .state
            .clients
            .iter()
            .filter(|client| match owners.as_ref() {
                None => true,
                Some(owners) => owners.iter().any(|owner| {
                    client.is_assigned_to(owner) || client.created_by == *owner
                }),
            })
            .collect())
    }

    /// Tasks the signed-in user may see, scoped like clients.
    pub fn visible_tasks(&self) -> CrmResult<Vec<&Task>> {
        let viewer = self.require(Permission::ViewTasks)?;
        let owners = visible_owners(&self.state, &viewer);
        Ok(self
            .state
            .tasks
            .iter()
            .filter(|task| match owners.as_ref() {
                None => true,
                Some(owners) => owners.iter().any(|owner| task.is_owned_by(owner)),
            })
            .collect())
    }

    pub fn pipeline_summary(&self) -> CrmResult<PipelineSummary> {
        let clients = self.visible_clients()?;
        let by_status = ClientStatus::ALL
            .iter()
            .map(|status| {
                let count = clients
                    .iter()
                    .filter(|client| client.status == *status)
                    .count();
                (*status, count)
            })
            .collect();

        Ok(PipelineSummary {
            by_status,
            total_clients: clients.len(),
            requested_amount: clients
                .iter()
                .fold(0, |total: u64, client| {
                    total.saturating_add(client.loan_details.requested_amount)
                }),
            approved_amount: clients
                .iter()
                .fold(0, |total: u64, client| {
                    total.saturating_add(client.loan_details.approved_amount)
                }),
            disbursed_amount: clients
                .iter()
                .fold(0, |total: u64, client| {
                    total.saturating_add(client.loan_details.disbursed_amount)
                }),
        })
    }

    /// Audit trail, newest first.
    pub fn activity_log(&self) -> CrmResult<&[ActivityLog]> {
        self.require(Permission::ViewActivityLog)?;
        Ok(&self.state.activity_logs)
    }
}
