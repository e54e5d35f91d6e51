use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::api::graphql::gql_error;
use crate::api::graphql::types::{service, AttachmentType, CommentType, ProjectType, TaskType};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn all_projects(&self, ctx: &Context<'_>) -> Result<Vec<ProjectType>> {
        let details = service(ctx)?
            .list_project_details(None)
            .await
            .map_err(gql_error)?;
        Ok(details.into_iter().map(ProjectType).collect())
    }

    async fn project(&self, ctx: &Context<'_>, id: Uuid) -> Result<ProjectType> {
        let details = service(ctx)?.project_details(id).await.map_err(gql_error)?;
        Ok(ProjectType(details))
    }

    async fn all_tasks(&self, ctx: &Context<'_>) -> Result<Vec<TaskType>> {
        let details = service(ctx)?
            .list_task_details()
            .await
            .map_err(gql_error)?;
        Ok(details.into_iter().map(TaskType).collect())
    }

    async fn task(&self, ctx: &Context<'_>, id: Uuid) -> Result<TaskType> {
        let details = service(ctx)?.task_details(id).await.map_err(gql_error)?;
        Ok(TaskType(details))
    }

    async fn all_comments(&self, ctx: &Context<'_>) -> Result<Vec<CommentType>> {
        let details = service(ctx)?
            .list_comment_details()
            .await
            .map_err(gql_error)?;
        Ok(details.into_iter().map(CommentType).collect())
    }

    async fn comment(&self, ctx: &Context<'_>, id: Uuid) -> Result<CommentType> {
        let details = service(ctx)?.comment_details(id).await.map_err(gql_error)?;
        Ok(CommentType(details))
    }

    async fn all_attachments(&self, ctx: &Context<'_>) -> Result<Vec<AttachmentType>> {
        let attachments = service(ctx)?.list_attachments().await.map_err(gql_error)?;
        Ok(attachments.into_iter().map(AttachmentType).collect())
    }

    async fn attachment(&self, ctx: &Context<'_>, id: Uuid) -> Result<AttachmentType> {
        let attachment = service(ctx)?.get_attachment(id).await.map_err(gql_error)?;
        Ok(AttachmentType(attachment))
    }
}
