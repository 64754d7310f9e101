//! Client pipeline handlers.

use crate::access::Permission;
use crate::model::activity::{ActivityCategory, EntityRef};
use crate::model::client::{
    ApplicationStatus, Client, ClientStatus, LoanDetails, NewClient, RiskProfile,
};
use crate::model::new_id;
use crate::model::user::Role;
use crate::notify::NotificationType;
use crate::repo::record_repo::{Collection, RecordStore};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::audit::{client_changes, format_amount, loan_milestones, LoanMilestone};
use crate::service::crm_service::CrmService;
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::{remove_by_id, upsert_by_id};
use log::info;

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Creates a lead.
    ///
    /// Agents always own the leads they create. A trainee's lead stays
    /// unassigned and raises an info notification so a supervisor can pick
    /// it up.
    pub fn add_client(&mut self, input: NewClient) -> CrmResult<Client> {
        let actor = self.require(Permission::ManageClients)?;

        let assigned_to = match actor.role {
            Role::Agent => Some(actor.id.clone()),
            Role::Trainee => None,
            _ => input.assigned_to,
        };
        if let Some(user_id) = assigned_to.as_deref() {
            if self.state.user(user_id).is_none() {
                return Err(CrmError::not_found(Collection::Users, user_id));
            }
        }

        let client = Client {
            id: new_id("client"),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            status: ClientStatus::Lead,
            loan_type: input.loan_type,
            lead_source: input.lead_source,
            assigned_to,
            created_by: actor.id.clone(),
            contact_date: self.clock.today(),
            follow_up_date: input.follow_up_date,
            risk_profile: RiskProfile::Moderate,
            financial_goals: Vec::new(),
            portfolio: Vec::new(),
            loan_details: LoanDetails {
                requested_amount: input.requested_amount,
                ..LoanDetails::default()
            },
            application_status: ApplicationStatus::Pending,
            general_information: input.general_information,
        };
        client.validate()?;

        self.store.add(&client)?;
        self.state.clients.push(client.clone());
        self.record_activity(
            ActivityCategory::Client,
            format!("created client {}", client.name),
            Some(EntityRef::client(&client.id, &client.name)),
        );
        if actor.role == Role::Trainee {
            self.notify(
                NotificationType::Info,
                format!("{} just a lead generated: {}", actor.name, client.name),
                Some(client.id.clone()),
            );
        }
        Ok(client)
    }

    /// Replaces a client record.
    ///
    /// Tracked field changes are audited in one entry. Approval and
    /// disbursement notifications fire only when the amount leaves zero.
    pub fn update_client(&mut self, client: Client) -> CrmResult<Client> {
        self.require(Permission::ManageClients)?;
        client.validate()?;
        let prev = self
            .state
            .client(&client.id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Clients, &client.id))?;
        if let Some(user_id) = client.assigned_to.as_deref() {
            let changed = prev.assigned_to.as_deref() != Some(user_id);
            if changed && self.state.user(user_id).is_none() {
                return Err(CrmError::not_found(Collection::Users, user_id));
            }
        }

        self.store.put(&client)?;
        let changes = client_changes(&prev, &client, &self.state);
        upsert_by_id(&mut self.state.clients, client.clone());

        if !changes.is_empty() {
            self.record_activity(
                ActivityCategory::Client,
                format!("updated client {}: {}", client.name, changes.join("; ")),
                Some(EntityRef::client(&client.id, &client.name)),
            );
        }
        for milestone in loan_milestones(&prev.loan_details, &client.loan_details) {
            let message = match milestone {
                LoanMilestone::Approved => format!(
                    "Loan approved for {}: {}",
                    client.name,
                    format_amount(client.loan_details.approved_amount)
                ),
                LoanMilestone::Disbursed => format!(
                    "Funds disbursed for {}: {}",
                    client.name,
                    format_amount(client.loan_details.disbursed_amount)
                ),
            };
            self.notify(NotificationType::StatusChange, message, Some(client.id.clone()));
        }
        Ok(client)
    }

    /// Deletes a client together with its interactions in one store
    /// transaction.
    pub fn delete_client(&mut self, id: &str) -> CrmResult<()> {
        self.require(Permission::DeleteClients)?;
        let client = self
            .state
            .client(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Clients, id))?;

        let mut keys: Vec<(Collection, String)> = self
            .state
            .interactions
            .iter()
            .filter(|interaction| interaction.client_id.as_deref() == Some(id))
            .map(|interaction| (Collection::Interactions, interaction.id.clone()))
            .collect();
        keys.push((Collection::Clients, id.to_string()));

        self.store.delete_items(&keys)?;
        remove_by_id(&mut self.state.clients, id);
        self.state
            .interactions
            .retain(|interaction| interaction.client_id.as_deref() != Some(id));

        self.record_activity(
            ActivityCategory::Client,
            format!("deleted client {}", client.name),
            Some(EntityRef::client(&client.id, &client.name)),
        );
        Ok(())
    }

    /// Assigns many clients to one user with a single aggregate audit entry.
    ///
    /// Unknown client ids are skipped. Returns the number reassigned.
    pub fn bulk_assign(&mut self, client_ids: &[String], user_id: &str) -> CrmResult<usize> {
        self.require(Permission::AssignClients)?;
        let assignee = self
            .state
            .user(user_id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Users, user_id))?;

        let updated: Vec<Client> = self
            .state
            .clients
            .iter()
            .filter(|client| client_ids.contains(&client.id))
            .map(|client| Client {
                assigned_to: Some(assignee.id.clone()),
                ..client.clone()
            })
            .collect();
        if updated.is_empty() {
            return Ok(0);
        }

        self.store.bulk_put(&updated)?;
        let count = updated.len();
        for client in updated {
            upsert_by_id(&mut self.state.clients, client);
        }
        info!(
            "event=bulk_assign module=service status=ok count={} assignee={}",
            count, assignee.id
        );
        self.record_activity(
            ActivityCategory::Client,
            format!("assigned {count} leads to {}", assignee.name),
            None,
        );
        Ok(count)
    }
}
