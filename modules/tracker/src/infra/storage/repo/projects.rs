use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Project, ProjectCommentCount, ProjectTaskCount, User};
use crate::domain::repo::ProjectsRepository;
use crate::infra::storage::entity::{
    attachments, comments, project_members, projects, tasks, users,
};
use crate::infra::storage::mapper;

use super::SeaOrmStore;

#[async_trait]
impl ProjectsRepository for SeaOrmStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        let found = projects::Entity::find_by_id(id)
            .one(self.conn())
            .await
            .context("projects find_by_id failed")?;
        Ok(found.map(mapper::project_to_contract))
    }

    async fn list(&self, active_only: Option<bool>) -> anyhow::Result<Vec<Project>> {
        let mut query = projects::Entity::find();
        if let Some(active) = active_only {
            query = query.filter(projects::Column::IsActive.eq(active));
        }
        let rows = query
            .order_by_desc(projects::Column::CreatedAt)
            .order_by_asc(projects::Column::Id)
            .all(self.conn())
            .await
            .context("projects list failed")?;
        Ok(rows.into_iter().map(mapper::project_to_contract).collect())
    }

    async fn insert(&self, project: Project, member_ids: &[Uuid]) -> anyhow::Result<()> {
        let txn = self.conn().begin().await?;

        let m = projects::ActiveModel {
            id: Set(project.id),
            name: Set(project.name),
            description: Set(project.description),
            owner_id: Set(project.owner_id),
            created_at: Set(project.created_at),
            updated_at: Set(project.updated_at),
            is_active: Set(project.is_active),
        };
        let project_id = project.id;
        m.insert(&txn).await.context("projects insert failed")?;

        if !member_ids.is_empty() {
            let rows = member_ids.iter().map(|user_id| project_members::ActiveModel {
                project_id: Set(project_id),
                user_id: Set(*user_id),
            });
            project_members::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .context("membership insert failed")?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn update(&self, project: Project) -> anyhow::Result<()> {
        let m = projects::ActiveModel {
            id: Set(project.id),
            name: Set(project.name),
            description: Set(project.description),
            owner_id: Set(project.owner_id),
            created_at: Set(project.created_at),
            updated_at: Set(project.updated_at),
            is_active: Set(project.is_active),
        };
        m.update(self.conn())
            .await
            .context("projects update failed")?;
        Ok(())
    }

    async fn set_members(&self, project_id: Uuid, member_ids: &[Uuid]) -> anyhow::Result<()> {
        let txn = self.conn().begin().await?;

        project_members::Entity::delete_many()
            .filter(project_members::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await?;
        if !member_ids.is_empty() {
            let rows = member_ids.iter().map(|user_id| project_members::ActiveModel {
                project_id: Set(project_id),
                user_id: Set(*user_id),
            });
            project_members::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .context("membership replace failed")?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn members_for(&self, project_ids: &[Uuid]) -> anyhow::Result<Vec<(Uuid, User)>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = project_members::Entity::find()
            .filter(project_members::Column::ProjectId.is_in(project_ids.iter().copied()))
            .find_also_related(users::Entity)
            .all(self.conn())
            .await
            .context("batch members lookup failed")?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, user)| {
                user.map(|u| (link.project_id, mapper::user_to_contract(u)))
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn().begin().await?;

        let task_ids: Vec<Uuid> = tasks::Entity::find()
            .filter(tasks::Column::ProjectId.eq(id))
            .select_only()
            .column(tasks::Column::Id)
            .into_tuple()
            .all(&txn)
            .await
            .context("project task lookup failed")?;

        if !task_ids.is_empty() {
            comments::Entity::delete_many()
                .filter(comments::Column::TaskId.is_in(task_ids.iter().copied()))
                .exec(&txn)
                .await?;
            attachments::Entity::delete_many()
                .filter(attachments::Column::TaskId.is_in(task_ids.iter().copied()))
                .exec(&txn)
                .await?;
            tasks::Entity::delete_many()
                .filter(tasks::Column::Id.is_in(task_ids))
                .exec(&txn)
                .await?;
        }

        project_members::Entity::delete_many()
            .filter(project_members::Column::ProjectId.eq(id))
            .exec(&txn)
            .await?;
        let res = projects::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("projects delete failed")?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    async fn task_counts(&self) -> anyhow::Result<Vec<ProjectTaskCount>> {
        let projects = self.list(None).await?;

        let counts: Vec<(Uuid, i64)> = tasks::Entity::find()
            .select_only()
            .column(tasks::Column::ProjectId)
            .column_as(tasks::Column::Id.count(), "count")
            .group_by(tasks::Column::ProjectId)
            .into_tuple()
            .all(self.conn())
            .await
            .context("task count query failed")?;
        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

        Ok(projects
            .into_iter()
            .map(|p| ProjectTaskCount {
                task_count: counts.get(&p.id).copied().unwrap_or(0),
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    async fn comment_counts(&self) -> anyhow::Result<Vec<ProjectCommentCount>> {
        let projects = self.list(None).await?;

        let counts: Vec<(Uuid, i64)> = comments::Entity::find()
            .select_only()
            .column(tasks::Column::ProjectId)
            .column_as(comments::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, comments::Relation::Task.def())
            .group_by(tasks::Column::ProjectId)
            .into_tuple()
            .all(self.conn())
            .await
            .context("comment count query failed")?;
        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

        Ok(projects
            .into_iter()
            .map(|p| ProjectCommentCount {
                comment_count: counts.get(&p.id).copied().unwrap_or(0),
                id: p.id,
                name: p.name,
            })
            .collect())
    }
}
