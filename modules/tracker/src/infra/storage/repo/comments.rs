use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::contract::model::Comment;
use crate::domain::repo::CommentsRepository;
use crate::infra::storage::entity::comments;
use crate::infra::storage::mapper;

use super::SeaOrmStore;

fn to_active_model(comment: Comment) -> comments::ActiveModel {
    comments::ActiveModel {
        id: Set(comment.id),
        task_id: Set(comment.task_id),
        author_id: Set(comment.author_id),
        content: Set(comment.content),
        created_at: Set(comment.created_at),
    }
}

#[async_trait]
impl CommentsRepository for SeaOrmStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        let found = comments::Entity::find_by_id(id)
            .one(self.conn())
            .await
            .context("comments find_by_id failed")?;
        Ok(found.map(mapper::comment_to_contract))
    }

    async fn list(&self) -> anyhow::Result<Vec<Comment>> {
        let rows = comments::Entity::find()
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(self.conn())
            .await
            .context("comments list failed")?;
        Ok(rows.into_iter().map(mapper::comment_to_contract).collect())
    }

    async fn list_by_task(&self, task_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let rows = comments::Entity::find()
            .filter(comments::Column::TaskId.eq(task_id))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(self.conn())
            .await
            .context("comments list_by_task failed")?;
        Ok(rows.into_iter().map(mapper::comment_to_contract).collect())
    }

    async fn list_by_tasks(&self, task_ids: &[Uuid]) -> anyhow::Result<Vec<Comment>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = comments::Entity::find()
            .filter(comments::Column::TaskId.is_in(task_ids.iter().copied()))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(self.conn())
            .await
            .context("comments list_by_tasks failed")?;
        Ok(rows.into_iter().map(mapper::comment_to_contract).collect())
    }

    async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Comment>> {
        let rows = comments::Entity::find()
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .limit(limit)
            .all(self.conn())
            .await
            .context("comments recent failed")?;
        Ok(rows.into_iter().map(mapper::comment_to_contract).collect())
    }

    async fn insert(&self, comment: Comment) -> anyhow::Result<()> {
        to_active_model(comment)
            .insert(self.conn())
            .await
            .context("comments insert failed")?;
        Ok(())
    }

    async fn update(&self, comment: Comment) -> anyhow::Result<()> {
        to_active_model(comment)
            .update(self.conn())
            .await
            .context("comments update failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = comments::Entity::delete_by_id(id)
            .exec(self.conn())
            .await
            .context("comments delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
