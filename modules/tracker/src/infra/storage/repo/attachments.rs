use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::contract::model::Attachment;
use crate::domain::repo::AttachmentsRepository;
use crate::infra::storage::entity::attachments;
use crate::infra::storage::mapper;

use super::SeaOrmStore;

fn to_active_model(attachment: Attachment) -> attachments::ActiveModel {
    attachments::ActiveModel {
        id: Set(attachment.id),
        task_id: Set(attachment.task_id),
        file_ref: Set(attachment.file_ref),
        uploaded_at: Set(attachment.uploaded_at),
    }
}

#[async_trait]
impl AttachmentsRepository for SeaOrmStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Attachment>> {
        let found = attachments::Entity::find_by_id(id)
            .one(self.conn())
            .await
            .context("attachments find_by_id failed")?;
        Ok(found.map(mapper::attachment_to_contract))
    }

    async fn list(&self) -> anyhow::Result<Vec<Attachment>> {
        let rows = attachments::Entity::find()
            .order_by_asc(attachments::Column::UploadedAt)
            .order_by_asc(attachments::Column::Id)
            .all(self.conn())
            .await
            .context("attachments list failed")?;
        Ok(rows
            .into_iter()
            .map(mapper::attachment_to_contract)
            .collect())
    }

    async fn list_by_tasks(&self, task_ids: &[Uuid]) -> anyhow::Result<Vec<Attachment>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = attachments::Entity::find()
            .filter(attachments::Column::TaskId.is_in(task_ids.iter().copied()))
            .order_by_asc(attachments::Column::UploadedAt)
            .order_by_asc(attachments::Column::Id)
            .all(self.conn())
            .await
            .context("attachments list_by_tasks failed")?;
        Ok(rows
            .into_iter()
            .map(mapper::attachment_to_contract)
            .collect())
    }

    async fn insert(&self, attachment: Attachment) -> anyhow::Result<()> {
        to_active_model(attachment)
            .insert(self.conn())
            .await
            .context("attachments insert failed")?;
        Ok(())
    }

    async fn update(&self, attachment: Attachment) -> anyhow::Result<()> {
        to_active_model(attachment)
            .update(self.conn())
            .await
            .context("attachments update failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = attachments::Entity::delete_by_id(id)
            .exec(self.conn())
            .await
            .context("attachments delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
