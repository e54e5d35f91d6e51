//! Attachment mutations and reads.
//!
//! The service stores only the opaque blob key; moving bytes in and out of
//! the blob store is the projection's job.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::Attachment;

use super::{require_non_blank, storage_error, Service};

impl Service {
    #[instrument(
        name = "tracker.service.create_attachment",
        skip(self, file_ref),
        fields(task_id = %task_id)
    )]
    pub async fn create_attachment(
        &self,
        task_id: Uuid,
        file_ref: String,
    ) -> Result<Attachment, TrackerError> {
        info!("Creating attachment");

        require_non_blank("file", &file_ref)?;
        self.require_task(task_id).await?;

        let attachment = Attachment {
            id: Uuid::new_v4(),
            task_id,
            file_ref,
            uploaded_at: Utc::now(),
        };

        self.attachments
            .insert(attachment.clone())
            .await
            .map_err(storage_error)?;

        info!("Created attachment id={}", attachment.id);
        Ok(attachment)
    }

    /// Re-point an attachment at another task. The blob key never changes.
    #[instrument(
        name = "tracker.service.update_attachment",
        skip(self),
        fields(attachment_id = %id, task_id = %task_id)
    )]
    pub async fn update_attachment(
        &self,
        id: Uuid,
        task_id: Uuid,
    ) -> Result<Attachment, TrackerError> {
        let mut attachment = self.get_attachment(id).await?;
        self.require_task(task_id).await?;

        attachment.task_id = task_id;
        self.attachments
            .update(attachment.clone())
            .await
            .map_err(storage_error)?;
        Ok(attachment)
    }

    /// Delete the attachment record and return it so the projection can
    /// clean up the blob.
    #[instrument(name = "tracker.service.delete_attachment", skip(self), fields(attachment_id = %id))]
    pub async fn delete_attachment(&self, id: Uuid) -> Result<Attachment, TrackerError> {
        info!("Deleting attachment");
        let attachment = self.get_attachment(id).await?;
        let deleted = self.attachments.delete(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(TrackerError::not_found("Attachment", id));
        }
        Ok(attachment)
    }

    pub async fn get_attachment(&self, id: Uuid) -> Result<Attachment, TrackerError> {
        self.attachments
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TrackerError::not_found("Attachment", id))
    }

    pub async fn list_attachments(&self) -> Result<Vec<Attachment>, TrackerError> {
        self.attachments.list().await.map_err(storage_error)
    }
}
