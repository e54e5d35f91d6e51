//! GraphQL object types. Nodes wrap the contract detail composites; fields
//! that point back up the graph (task → project, attachment → task) resolve
//! lazily through the service.

use std::sync::Arc;

use async_graphql::{Context, Enum, Object, Result, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::api::graphql::gql_error;
use crate::contract::model::{
    Attachment, CommentDetails, ProjectDetails, TaskDetails, TaskStatus, User,
};
use crate::domain::service::Service;

pub(crate) fn service<'a>(ctx: &Context<'a>) -> Result<&'a Arc<Service>> {
    ctx.data::<Arc<Service>>()
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum TaskStatusType {
    #[graphql(name = "TODO")]
    Todo,
    #[graphql(name = "INPR")]
    InProgress,
    #[graphql(name = "DONE")]
    Done,
}

impl From<TaskStatus> for TaskStatusType {
    fn from(s: TaskStatus) -> Self {
        match s {
            TaskStatus::Todo => TaskStatusType::Todo,
            TaskStatus::InProgress => TaskStatusType::InProgress,
            TaskStatus::Done => TaskStatusType::Done,
        }
    }
}

impl From<TaskStatusType> for TaskStatus {
    fn from(s: TaskStatusType) -> Self {
        match s {
            TaskStatusType::Todo => TaskStatus::Todo,
            TaskStatusType::InProgress => TaskStatus::InProgress,
            TaskStatusType::Done => TaskStatus::Done,
        }
    }
}

/// Result payload for delete mutations.
#[derive(SimpleObject)]
pub struct DeletePayload {
    pub ok: bool,
}

pub struct UserType(pub(crate) User);

#[Object]
impl UserType {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn email(&self) -> &str {
        &self.0.email
    }
}

pub struct ProjectType(pub(crate) ProjectDetails);

#[Object]
impl ProjectType {
    async fn id(&self) -> Uuid {
        self.0.project.id
    }

    async fn name(&self) -> &str {
        &self.0.project.name
    }

    async fn description(&self) -> &str {
        &self.0.project.description
    }

    async fn is_active(&self) -> bool {
        self.0.project.is_active
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.project.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.project.updated_at
    }

    async fn owner(&self) -> UserType {
        UserType(self.0.owner.clone())
    }

    async fn members(&self) -> Vec<UserType> {
        self.0.members.iter().cloned().map(UserType).collect()
    }

    async fn tasks(&self) -> Vec<TaskType> {
        self.0.tasks.iter().cloned().map(TaskType).collect()
    }
}

pub struct TaskType(pub(crate) TaskDetails);

#[Object]
impl TaskType {
    async fn id(&self) -> Uuid {
        self.0.task.id
    }

    async fn title(&self) -> &str {
        &self.0.task.title
    }

    async fn description(&self) -> &str {
        &self.0.task.description
    }

    async fn status(&self) -> TaskStatusType {
        self.0.task.status.into()
    }

    async fn due_date(&self) -> Option<NaiveDate> {
        self.0.task.due_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.task.created_at
    }

    async fn project(&self, ctx: &Context<'_>) -> Result<ProjectType> {
        let details = service(ctx)?
            .project_details(self.0.task.project_id)
            .await
            .map_err(gql_error)?;
        Ok(ProjectType(details))
    }

    async fn assigned_to(&self) -> Option<UserType> {
        self.0.assignee.clone().map(UserType)
    }

    async fn comments(&self) -> Vec<CommentType> {
        self.0.comments.iter().cloned().map(CommentType).collect()
    }

    async fn attachments(&self) -> Vec<AttachmentType> {
        self.0
            .attachments
            .iter()
            .cloned()
            .map(AttachmentType)
            .collect()
    }
}

pub struct CommentType(pub(crate) CommentDetails);

#[Object]
impl CommentType {
    async fn id(&self) -> Uuid {
        self.0.comment.id
    }

    async fn content(&self) -> &str {
        &self.0.comment.content
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.comment.created_at
    }

    async fn author(&self) -> UserType {
        UserType(self.0.author.clone())
    }

    async fn task(&self, ctx: &Context<'_>) -> Result<TaskType> {
        let details = service(ctx)?
            .task_details(self.0.comment.task_id)
            .await
            .map_err(gql_error)?;
        Ok(TaskType(details))
    }
}

pub struct AttachmentType(pub(crate) Attachment);

#[Object]
impl AttachmentType {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn file_ref(&self) -> &str {
        &self.0.file_ref
    }

    async fn uploaded_at(&self) -> DateTime<Utc> {
        self.0.uploaded_at
    }

    async fn task(&self, ctx: &Context<'_>) -> Result<TaskType> {
        let details = service(ctx)?
            .task_details(self.0.task_id)
            .await
            .map_err(gql_error)?;
        Ok(TaskType(details))
    }
}
