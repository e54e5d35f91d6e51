use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{StatusCount, Task, TaskStatus};
use crate::domain::repo::TasksRepository;
use crate::infra::storage::entity::{attachments, comments, tasks};
use crate::infra::storage::mapper;

use super::SeaOrmStore;

fn to_contract_many(rows: Vec<tasks::Model>) -> anyhow::Result<Vec<Task>> {
    rows.into_iter().map(mapper::task_to_contract).collect()
}

fn to_active_model(task: Task) -> tasks::ActiveModel {
    tasks::ActiveModel {
        id: Set(task.id),
        project_id: Set(task.project_id),
        title: Set(task.title),
        description: Set(task.description),
        assigned_to: Set(task.assigned_to),
        status: Set(task.status.as_str().to_string()),
        due_date: Set(task.due_date),
        created_at: Set(task.created_at),
    }
}

#[async_trait]
impl TasksRepository for SeaOrmStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>> {
        let found = tasks::Entity::find_by_id(id)
            .one(self.conn())
            .await
            .context("tasks find_by_id failed")?;
        found.map(mapper::task_to_contract).transpose()
    }

    async fn list(&self) -> anyhow::Result<Vec<Task>> {
        let rows = tasks::Entity::find()
            .order_by_asc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Id)
            .all(self.conn())
            .await
            .context("tasks list failed")?;
        to_contract_many(rows)
    }

    async fn list_by_projects(&self, project_ids: &[Uuid]) -> anyhow::Result<Vec<Task>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = tasks::Entity::find()
            .filter(tasks::Column::ProjectId.is_in(project_ids.iter().copied()))
            .order_by_asc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Id)
            .all(self.conn())
            .await
            .context("tasks list_by_projects failed")?;
        to_contract_many(rows)
    }

    async fn list_by_status(&self, status: TaskStatus) -> anyhow::Result<Vec<Task>> {
        let rows = tasks::Entity::find()
            .filter(tasks::Column::Status.eq(status.as_str()))
            .order_by_asc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Id)
            .all(self.conn())
            .await
            .context("tasks list_by_status failed")?;
        to_contract_many(rows)
    }

    async fn list_by_assignee(&self, user_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let rows = tasks::Entity::find()
            .filter(tasks::Column::AssignedTo.eq(user_id))
            .order_by_asc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Id)
            .all(self.conn())
            .await
            .context("tasks list_by_assignee failed")?;
        to_contract_many(rows)
    }

    async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Task>> {
        let rows = tasks::Entity::find()
            .order_by_desc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Id)
            .limit(limit)
            .all(self.conn())
            .await
            .context("tasks recent failed")?;
        to_contract_many(rows)
    }

    async fn insert(&self, task: Task) -> anyhow::Result<()> {
        to_active_model(task)
            .insert(self.conn())
            .await
            .context("tasks insert failed")?;
        Ok(())
    }

    async fn update(&self, task: Task) -> anyhow::Result<()> {
        to_active_model(task)
            .update(self.conn())
            .await
            .context("tasks update failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn().begin().await?;

        comments::Entity::delete_many()
            .filter(comments::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        attachments::Entity::delete_many()
            .filter(attachments::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        let res = tasks::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("tasks delete failed")?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    async fn status_summary(&self) -> anyhow::Result<Vec<StatusCount>> {
        let rows: Vec<(String, i64)> = tasks::Entity::find()
            .select_only()
            .column(tasks::Column::Status)
            .column_as(tasks::Column::Id.count(), "count")
            .group_by(tasks::Column::Status)
            .into_tuple()
            .all(self.conn())
            .await
            .context("status summary query failed")?;

        rows.into_iter()
            .map(|(status, count)| {
                let status: TaskStatus = status
                    .parse()
                    .map_err(|()| anyhow!("unknown stored status '{status}'"))?;
                Ok(StatusCount { status, count })
            })
            .collect()
    }
}
