//! Domain service: the mutation layer and the query/aggregation layer.
//!
//! Every mutation that defaults ownership or authorship takes the acting
//! identity as an explicit parameter; nothing is read from ambient context.
//! The service depends only on the repository ports.

mod accounts;
mod attachments;
mod comments;
mod projects;
mod reports;
mod tasks;

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::{Attachment, Comment, CommentDetails, Task, TaskDetails, User};
use crate::domain::repo::{
    AttachmentsRepository, CommentsRepository, ProjectsRepository, TasksRepository,
    UsersRepository,
};

#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    projects: Arc<dyn ProjectsRepository>,
    tasks: Arc<dyn TasksRepository>,
    comments: Arc<dyn CommentsRepository>,
    attachments: Arc<dyn AttachmentsRepository>,
}

impl Service {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        projects: Arc<dyn ProjectsRepository>,
        tasks: Arc<dyn TasksRepository>,
        comments: Arc<dyn CommentsRepository>,
        attachments: Arc<dyn AttachmentsRepository>,
    ) -> Self {
        Self {
            users,
            projects,
            tasks,
            comments,
            attachments,
        }
    }

    // --- shared read-side assembly ---------------------------------------

    /// Resolve authorship for a batch of comments with one user query.
    pub(crate) async fn assemble_comment_details(
        &self,
        comments: Vec<Comment>,
    ) -> Result<Vec<CommentDetails>, TrackerError> {
        let author_ids: Vec<Uuid> = dedup_ids(comments.iter().map(|c| c.author_id));
        let authors = self
            .users
            .find_many(&author_ids)
            .await
            .map_err(storage_error)?;
        let by_id: HashMap<Uuid, User> = authors.into_iter().map(|u| (u.id, u)).collect();

        comments
            .into_iter()
            .map(|comment| {
                let author = by_id.get(&comment.author_id).cloned().ok_or_else(|| {
                    TrackerError::integrity(format!(
                        "comment {} references missing author {}",
                        comment.id, comment.author_id
                    ))
                })?;
                Ok(CommentDetails { comment, author })
            })
            .collect()
    }

    /// Resolve assignees, comments and attachments for a batch of tasks with
    /// a fixed number of queries, independent of batch size.
    pub(crate) async fn assemble_task_details(
        &self,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskDetails>, TrackerError> {
        let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();

        let assignee_ids: Vec<Uuid> = dedup_ids(tasks.iter().filter_map(|t| t.assigned_to));
        let assignees = self
            .users
            .find_many(&assignee_ids)
            .await
            .map_err(storage_error)?;
        let assignees: HashMap<Uuid, User> = assignees.into_iter().map(|u| (u.id, u)).collect();

        let comments = self
            .comments
            .list_by_tasks(&task_ids)
            .await
            .map_err(storage_error)?;
        let comment_details = self.assemble_comment_details(comments).await?;
        let mut comments_by_task: HashMap<Uuid, Vec<CommentDetails>> = HashMap::new();
        for detail in comment_details {
            comments_by_task
                .entry(detail.comment.task_id)
                .or_default()
                .push(detail);
        }

        let attachments = self
            .attachments
            .list_by_tasks(&task_ids)
            .await
            .map_err(storage_error)?;
        let mut attachments_by_task: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
        for attachment in attachments {
            attachments_by_task
                .entry(attachment.task_id)
                .or_default()
                .push(attachment);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let assignee = task.assigned_to.and_then(|id| assignees.get(&id).cloned());
                let comments = comments_by_task.remove(&task.id).unwrap_or_default();
                let attachments = attachments_by_task.remove(&task.id).unwrap_or_default();
                TaskDetails {
                    task,
                    assignee,
                    comments,
                    attachments,
                }
            })
            .collect())
    }
}

/// Map a storage failure into the public taxonomy.
pub(crate) fn storage_error(e: anyhow::Error) -> TrackerError {
    TrackerError::internal(e.to_string())
}

pub(crate) fn dedup_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Reject blank required text fields.
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), TrackerError> {
    if value.trim().is_empty() {
        return Err(TrackerError::validation(field, "must not be empty"));
    }
    Ok(())
}
