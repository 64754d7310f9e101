//! Communication log handlers.

use crate::access::Permission;
use crate::model::activity::{ActivityCategory, EntityRef};
use crate::model::interaction::{BulkEmail, Interaction, InteractionType, NewInteraction};
use crate::model::new_id;
use crate::model::validation::require_text;
use crate::repo::record_repo::RecordStore;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::crm_service::CrmService;
use crate::service::error::CrmResult;

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Logs one interaction and prepends it to the feed.
    ///
    /// When the referenced client is unknown the interaction is still kept
    /// but no audit entry is written.
    pub fn add_interaction(&mut self, input: NewInteraction) -> CrmResult<Interaction> {
        let actor = self.require(Permission::ManageClients)?;
        require_text(&input.notes, "interaction notes")?;

        let interaction = Interaction {
            id: new_id("interaction"),
            client_id: input.client_id,
            kind: input.kind,
            subject: input.subject,
            notes: input.notes,
            attachments: input.attachments,
            user_id: actor.id,
            timestamp: self.now(),
        };
        self.store.add(&interaction)?;
        self.state.interactions.insert(0, interaction.clone());

        let client = interaction
            .client_id
            .as_deref()
            .and_then(|id| self.state.client(id))
            .map(|client| (client.id.clone(), client.name.clone()));
        if let Some((client_id, client_name)) = client {
            self.record_activity(
                ActivityCategory::Communication,
                format!("logged {} with {}", interaction.kind, client_name),
                Some(EntityRef::client(client_id, client_name)),
            );
        }
        Ok(interaction)
    }

    /// Sends one email per known client in a single batch.
    ///
    /// Returns the number of emails logged.
    pub fn bulk_email(&mut self, input: BulkEmail) -> CrmResult<usize> {
        let actor = self.require(Permission::BulkEmail)?;
        require_text(&input.subject, "email subject")?;
        require_text(&input.message, "email message")?;

        let now = self.now();
        let batch: Vec<Interaction> = input
            .client_ids
            .iter()
            .filter(|id| self.state.client(id).is_some())
            .map(|id| Interaction {
                id: new_id("interaction"),
                client_id: Some(id.clone()),
                kind: InteractionType::Email,
                subject: Some(input.subject.clone()),
                notes: input.message.clone(),
                attachments: input.attachments.clone(),
                user_id: actor.id.clone(),
                timestamp: now,
            })
            .collect();
        if batch.is_empty() {
            return Ok(0);
        }

        self.store.bulk_add(&batch)?;
        let count = batch.len();
        let mut feed = batch;
        feed.append(&mut self.state.interactions);
        self.state.interactions = feed;
        self.record_activity(
            ActivityCategory::Communication,
            format!("sent bulk email \"{}\" to {count} clients", input.subject),
            None,
        );
        Ok(count)
    }

    /// Interactions for one client, newest first.
    pub fn client_interactions(&self, client_id: &str) -> Vec<&Interaction> {
        self.state
            .interactions
            .iter()
            .filter(|interaction| interaction.client_id.as_deref() == Some(client_id))
            .collect()
    }
}
