use std::io::Read;
use std::sync::Arc;

use async_graphql::{Context, Object, Result, Upload};
use authn::CurrentUser;
use blobstore::BlobStore;
use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::api::graphql::gql_error;
use crate::api::graphql::types::{
    service, AttachmentType, CommentType, DeletePayload, ProjectType, TaskStatusType, TaskType,
};
use crate::contract::model::{NewComment, NewProject, NewTask, ProjectPatch, TaskPatch};

pub struct MutationRoot;

fn actor(ctx: &Context<'_>) -> Result<Uuid> {
    Ok(ctx.data::<CurrentUser>()?.id)
}

#[Object]
impl MutationRoot {
    /// Create a project owned by the acting identity. There is deliberately
    /// no owner argument.
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
        is_active: Option<bool>,
        member_ids: Option<Vec<Uuid>>,
    ) -> Result<ProjectType> {
        let details = service(ctx)?
            .create_project(
                actor(ctx)?,
                NewProject {
                    name,
                    description: description.unwrap_or_default(),
                    is_active: is_active.unwrap_or(true),
                    member_ids: member_ids.unwrap_or_default(),
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(ProjectType(details))
    }

    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        is_active: Option<bool>,
        member_ids: Option<Vec<Uuid>>,
    ) -> Result<ProjectType> {
        let details = service(ctx)?
            .update_project(
                id,
                ProjectPatch {
                    name,
                    description,
                    is_active,
                    member_ids,
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(ProjectType(details))
    }

    /// `ok: false` when the project was already absent; never an error.
    async fn delete_project(&self, ctx: &Context<'_>, id: Uuid) -> Result<DeletePayload> {
        let ok = service(ctx)?.delete_project(id).await.map_err(gql_error)?;
        Ok(DeletePayload { ok })
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_task(
        &self,
        ctx: &Context<'_>,
        title: String,
        project_id: Uuid,
        description: Option<String>,
        assigned_to_id: Option<Uuid>,
        status: Option<TaskStatusType>,
        due_date: Option<NaiveDate>,
    ) -> Result<TaskType> {
        let details = service(ctx)?
            .create_task(NewTask {
                title,
                project_id,
                description: description.unwrap_or_default(),
                assigned_to: assigned_to_id,
                status: status
                    .map(Into::into)
                    .unwrap_or(crate::contract::model::TaskStatus::Todo),
                due_date,
            })
            .await
            .map_err(gql_error)?;
        Ok(TaskType(details))
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        title: Option<String>,
        description: Option<String>,
        status: Option<TaskStatusType>,
        assigned_to_id: Option<Uuid>,
        due_date: Option<NaiveDate>,
    ) -> Result<TaskType> {
        let details = service(ctx)?
            .update_task(
                id,
                TaskPatch {
                    title,
                    description,
                    status: status.map(Into::into),
                    project_id: None,
                    // GraphQL cannot distinguish absent from null; an absent
                    // argument leaves the assignment as-is. Clearing goes
                    // through the REST PATCH.
                    assigned_to: assigned_to_id.map(Some),
                    due_date: due_date.map(Some),
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(TaskType(details))
    }

    async fn delete_task(&self, ctx: &Context<'_>, id: Uuid) -> Result<DeletePayload> {
        service(ctx)?.delete_task(id).await.map_err(gql_error)?;
        Ok(DeletePayload { ok: true })
    }

    /// Create a comment authored by the acting identity.
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        content: String,
        task_id: Uuid,
    ) -> Result<CommentType> {
        let details = service(ctx)?
            .create_comment(actor(ctx)?, NewComment { content, task_id })
            .await
            .map_err(gql_error)?;
        Ok(CommentType(details))
    }

    async fn delete_comment(&self, ctx: &Context<'_>, id: Uuid) -> Result<DeletePayload> {
        service(ctx)?.delete_comment(id).await.map_err(gql_error)?;
        Ok(DeletePayload { ok: true })
    }

    /// Store the uploaded bytes in the blob store, then record the
    /// attachment under the returned key.
    async fn create_attachment(
        &self,
        ctx: &Context<'_>,
        task_id: Uuid,
        file: Upload,
    ) -> Result<AttachmentType> {
        let blobs = ctx.data::<Arc<dyn BlobStore>>()?;

        let value = file.value(ctx)?;
        let filename = value.filename.clone();
        let mut bytes = Vec::new();
        value.into_read().read_to_end(&mut bytes)?;

        let key = blobs
            .put(&filename, &bytes)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;

        match service(ctx)?.create_attachment(task_id, key.clone()).await {
            Ok(attachment) => Ok(AttachmentType(attachment)),
            Err(e) => {
                if let Err(cleanup) = blobs.delete(&key).await {
                    warn!("failed to clean up orphaned blob {key}: {cleanup}");
                }
                Err(gql_error(e))
            }
        }
    }

    async fn delete_attachment(&self, ctx: &Context<'_>, id: Uuid) -> Result<DeletePayload> {
        let attachment = service(ctx)?.delete_attachment(id).await.map_err(gql_error)?;

        let blobs = ctx.data::<Arc<dyn BlobStore>>()?;
        if let Err(e) = blobs.delete(&attachment.file_ref).await {
            warn!("failed to delete blob {}: {e}", attachment.file_ref);
        }
        Ok(DeletePayload { ok: true })
    }
}
