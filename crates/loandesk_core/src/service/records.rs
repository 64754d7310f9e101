//! Document and commitment handlers.

use crate::access::Permission;
use crate::model::activity::{ActivityCategory, EntityRef};
use crate::model::commitment::{Commitment, NewCommitment};
use crate::model::document::{Document, NewDocument};
use crate::model::new_id;
use crate::model::validation::require_text;
use crate::repo::record_repo::{Collection, RecordStore};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::audit::format_amount;
use crate::service::crm_service::CrmService;
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::{remove_by_id, upsert_by_id};

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Stores document metadata for a client.
    ///
    /// Unknown clients do not block the upload; only the audit entry is
    /// skipped.
    pub fn add_document(&mut self, input: NewDocument) -> CrmResult<Document> {
        let actor = self.require(Permission::ManageDocuments)?;
        require_text(&input.file_name, "file name")?;
        require_text(&input.client_id, "document client")?;

        let document = Document {
            id: new_id("document"),
            client_id: input.client_id,
            file_name: input.file_name.trim().to_string(),
            file_type: input.file_type,
            size: input.size,
            url: input.url,
            password: input.password,
            uploaded_by: actor.id,
            uploaded_at: self.now(),
        };
        self.store.add(&document)?;
        self.state.documents.push(document.clone());

        if let Some(entity) = self.client_ref(&document.client_id) {
            let action = format!(
                "uploaded {} for {}",
                document.file_name, entity.entity_name
            );
            self.record_activity(ActivityCategory::Document, action, Some(entity));
        }
        Ok(document)
    }

    pub fn delete_document(&mut self, id: &str) -> CrmResult<()> {
        self.require(Permission::ManageDocuments)?;
        let document = self
            .state
            .document(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Documents, id))?;

        self.store.delete_item(Collection::Documents, id)?;
        remove_by_id(&mut self.state.documents, id);
        if let Some(entity) = self.client_ref(&document.client_id) {
            let action = format!("deleted {} for {}", document.file_name, entity.entity_name);
            self.record_activity(ActivityCategory::Document, action, Some(entity));
        }
        Ok(())
    }

    pub fn client_documents(&self, client_id: &str) -> Vec<&Document> {
        self.state
            .documents
            .iter()
            .filter(|document| document.client_id == client_id)
            .collect()
    }

    pub fn add_commitment(&mut self, input: NewCommitment) -> CrmResult<Commitment> {
        let actor = self.require(Permission::ManageCommitments)?;
        if let Some(user_id) = input.user_id.as_deref() {
            if self.state.user(user_id).is_none() {
                return Err(CrmError::not_found(Collection::Users, user_id));
            }
        }

        let commitment = Commitment {
            id: new_id("commitment"),
            title: input.title.trim().to_string(),
            user_id: input.user_id,
            target_amount: input.target_amount,
            current_amount: 0,
            due_date: input.due_date,
            created_by: actor.id,
        };
        commitment.validate()?;

        self.store.add(&commitment)?;
        self.state.commitments.push(commitment.clone());
        self.record_activity(
            ActivityCategory::Commitment,
            format!(
                "created commitment {} (target {})",
                commitment.title,
                format_amount(commitment.target_amount)
            ),
            None,
        );
        Ok(commitment)
    }

    pub fn update_commitment(&mut self, commitment: Commitment) -> CrmResult<Commitment> {
        self.require(Permission::ManageCommitments)?;
        commitment.validate()?;
        let prev = self
            .state
            .commitment(&commitment.id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Commitments, &commitment.id))?;

        self.store.put(&commitment)?;
        upsert_by_id(&mut self.state.commitments, commitment.clone());

        let action = if prev.current_amount != commitment.current_amount
            || prev.target_amount != commitment.target_amount
        {
            format!(
                "updated commitment {}: progress {} of {}",
                commitment.title,
                format_amount(commitment.current_amount),
                format_amount(commitment.target_amount)
            )
        } else {
            format!("updated commitment {}", commitment.title)
        };
        self.record_activity(ActivityCategory::Commitment, action, None);
        Ok(commitment)
    }

    pub fn delete_commitment(&mut self, id: &str) -> CrmResult<()> {
        self.require(Permission::ManageCommitments)?;
        let commitment = self
            .state
            .commitment(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Commitments, id))?;

        self.store.delete_item(Collection::Commitments, id)?;
        remove_by_id(&mut self.state.commitments, id);
        self.record_activity(
            ActivityCategory::Commitment,
            format!("deleted commitment {}", commitment.title),
            None,
        );
        Ok(())
    }

    fn client_ref(&self, client_id: &str) -> Option<EntityRef> {
        self.state
            .client(client_id)
            .map(|client| EntityRef::client(&client.id, &client.name))
    }
}
