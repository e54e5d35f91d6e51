//! Task mutations and reads.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::{NewTask, Task, TaskDetails, TaskPatch, TaskStatus};

use super::{require_non_blank, storage_error, Service};

impl Service {
    #[instrument(
        name = "tracker.service.create_task",
        skip(self, input),
        fields(project_id = %input.project_id, title = %input.title)
    )]
    pub async fn create_task(&self, input: NewTask) -> Result<TaskDetails, TrackerError> {
        info!("Creating task");

        require_non_blank("title", &input.title)?;
        self.require_project(input.project_id).await?;
        if let Some(assignee) = input.assigned_to {
            self.get_user(assignee).await?;
        }

        let task = Task {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            assigned_to: input.assigned_to,
            status: input.status,
            due_date: input.due_date,
            created_at: Utc::now(),
        };

        self.tasks
            .insert(task.clone())
            .await
            .map_err(storage_error)?;

        info!("Created task id={}", task.id);
        self.task_details(task.id).await
    }

    /// Partial update. Assignment and due date use nested options so a PATCH
    /// can clear them; reassigning to another project requires the target
    /// project to resolve.
    #[instrument(name = "tracker.service.update_task", skip(self, patch), fields(task_id = %id))]
    pub async fn update_task(
        &self,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<TaskDetails, TrackerError> {
        info!("Updating task");

        let mut task = self.require_task(id).await?;

        if let Some(ref title) = patch.title {
            require_non_blank("title", title)?;
        }
        if let Some(project_id) = patch.project_id {
            self.require_project(project_id).await?;
        }
        if let Some(Some(assignee)) = patch.assigned_to {
            self.get_user(assignee).await?;
        }

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }

        self.tasks
            .update(task.clone())
            .await
            .map_err(storage_error)?;
        self.task_details(id).await
    }

    #[instrument(name = "tracker.service.delete_task", skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> Result<(), TrackerError> {
        info!("Deleting task");
        let deleted = self.tasks.delete(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(TrackerError::not_found("Task", id));
        }
        Ok(())
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, TrackerError> {
        self.require_task(id).await
    }

    #[instrument(name = "tracker.service.task_details", skip(self), fields(task_id = %id))]
    pub async fn task_details(&self, id: Uuid) -> Result<TaskDetails, TrackerError> {
        let task = self.require_task(id).await?;
        let mut details = self.assemble_task_details(vec![task]).await?;
        details
            .pop()
            .ok_or_else(|| TrackerError::internal("task details assembly produced no row"))
    }

    pub async fn list_task_details(&self) -> Result<Vec<TaskDetails>, TrackerError> {
        let tasks = self.tasks.list().await.map_err(storage_error)?;
        self.assemble_task_details(tasks).await
    }

    /// Tasks matching `status` exactly; None returns all tasks.
    #[instrument(name = "tracker.service.tasks_by_status", skip(self))]
    pub async fn tasks_by_status(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskDetails>, TrackerError> {
        let tasks = match status {
            Some(status) => self
                .tasks
                .list_by_status(status)
                .await
                .map_err(storage_error)?,
            None => self.tasks.list().await.map_err(storage_error)?,
        };
        self.assemble_task_details(tasks).await
    }

    /// Tasks assigned to `user_id`; None returns an empty list — omitting
    /// the filter is not "all tasks".
    #[instrument(name = "tracker.service.tasks_by_user", skip(self))]
    pub async fn tasks_by_user(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<TaskDetails>, TrackerError> {
        let tasks = match user_id {
            Some(user_id) => self
                .tasks
                .list_by_assignee(user_id)
                .await
                .map_err(storage_error)?,
            None => Vec::new(),
        };
        self.assemble_task_details(tasks).await
    }

    /// Newest tasks, `created_at` descending, at most `limit`.
    #[instrument(name = "tracker.service.recent_tasks", skip(self))]
    pub async fn recent_tasks(&self, limit: u64) -> Result<Vec<TaskDetails>, TrackerError> {
        let tasks = self.tasks.recent(limit).await.map_err(storage_error)?;
        self.assemble_task_details(tasks).await
    }

    pub(crate) async fn require_task(&self, id: Uuid) -> Result<Task, TrackerError> {
        self.tasks
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TrackerError::not_found("Task", id))
    }
}
