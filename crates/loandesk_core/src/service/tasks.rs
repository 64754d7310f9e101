//! Task handlers.

use crate::access::Permission;
use crate::model::activity::{ActivityCategory, EntityRef};
use crate::model::new_id;
use crate::model::task::{NewTask, Task};
use crate::repo::record_repo::{Collection, RecordStore};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::audit::task_action;
use crate::service::crm_service::CrmService;
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::{remove_by_id, upsert_by_id};

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Creates a task. Without an explicit assignee the creator owns it.
    pub fn add_task(&mut self, input: NewTask) -> CrmResult<Task> {
        let actor = self.require(Permission::ManageTasks)?;
        if let Some(user_id) = input.assigned_to.as_deref() {
            if self.state.user(user_id).is_none() {
                return Err(CrmError::not_found(Collection::Users, user_id));
            }
        }

        let task = Task {
            id: new_id("task"),
            title: input.title.trim().to_string(),
            description: input.description,
            client_id: input.client_id,
            due_date: input.due_date,
            completed: false,
            priority: input.priority,
            assigned_to: input.assigned_to.or_else(|| Some(actor.id.clone())),
            created_by: actor.id,
        };
        task.validate()?;

        self.store.add(&task)?;
        self.state.tasks.push(task.clone());
        self.record_activity(
            ActivityCategory::Task,
            format!("created task \"{}\"", task.title),
            Some(EntityRef::task(&task.id, &task.title)),
        );
        Ok(task)
    }

    /// Replaces a task record.
    ///
    /// `is_completion` marks a write that only flips `completed`; it selects
    /// the audit verb.
    pub fn update_task(&mut self, task: Task, is_completion: bool) -> CrmResult<Task> {
        self.require(Permission::ManageTasks)?;
        task.validate()?;
        if self.state.task(&task.id).is_none() {
            return Err(CrmError::not_found(Collection::Tasks, &task.id));
        }

        self.store.put(&task)?;
        upsert_by_id(&mut self.state.tasks, task.clone());
        self.record_activity(
            ActivityCategory::Task,
            format!(
                "{} \"{}\"",
                task_action(is_completion, task.completed),
                task.title
            ),
            Some(EntityRef::task(&task.id, &task.title)),
        );
        Ok(task)
    }

    pub fn toggle_task_completion(&mut self, id: &str) -> CrmResult<Task> {
        let mut task = self
            .state
            .task(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Tasks, id))?;
        task.completed = !task.completed;
        self.update_task(task, true)
    }

    pub fn delete_task(&mut self, id: &str) -> CrmResult<()> {
        self.require(Permission::ManageTasks)?;
        let task = self
            .state
            .task(id)
            .cloned()
            .ok_or_else(|| CrmError::not_found(Collection::Tasks, id))?;

        self.store.delete_item(Collection::Tasks, id)?;
        remove_by_id(&mut self.state.tasks, id);
        self.record_activity(
            ActivityCategory::Task,
            format!("deleted task \"{}\"", task.title),
            Some(EntityRef::task(&task.id, &task.title)),
        );
        Ok(())
    }
}
