use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Profile, User};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{
    attachments, comments, profiles, project_members, projects, tasks, users,
};
use crate::infra::storage::mapper;

use super::SeaOrmStore;

#[async_trait]
impl UsersRepository for SeaOrmStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = users::Entity::find_by_id(id)
            .one(self.conn())
            .await
            .context("users find_by_id failed")?;
        Ok(found.map(mapper::user_to_contract))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(self.conn())
            .await
            .context("users find_many failed")?;
        Ok(rows.into_iter().map(mapper::user_to_contract).collect())
    }

    async fn find_for_login(&self, username: &str) -> anyhow::Result<Option<(User, String)>> {
        let found = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.conn())
            .await
            .context("users find_for_login failed")?;
        Ok(found.map(|m| {
            let hash = m.password_hash.clone();
            (mapper::user_to_contract(m), hash)
        }))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(self.conn())
            .await
            .context("users username_exists failed")?;
        Ok(count > 0)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(self.conn())
            .await
            .context("users list failed")?;
        Ok(rows.into_iter().map(mapper::user_to_contract).collect())
    }

    async fn insert(&self, user: User, password_hash: String) -> anyhow::Result<()> {
        let m = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(password_hash),
            created_at: Set(user.created_at),
        };
        m.insert(self.conn()).await.context("users insert failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn().begin().await?;

        // Owned projects take their full task trees with them.
        let owned: Vec<Uuid> = projects::Entity::find()
            .filter(projects::Column::OwnerId.eq(id))
            .select_only()
            .column(projects::Column::Id)
            .into_tuple()
            .all(&txn)
            .await
            .context("owned project lookup failed")?;

        if !owned.is_empty() {
            let task_ids: Vec<Uuid> = tasks::Entity::find()
                .filter(tasks::Column::ProjectId.is_in(owned.iter().copied()))
                .select_only()
                .column(tasks::Column::Id)
                .into_tuple()
                .all(&txn)
                .await
                .context("owned task lookup failed")?;

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
                .filter(project_members::Column::ProjectId.is_in(owned.iter().copied()))
                .exec(&txn)
                .await?;
            projects::Entity::delete_many()
                .filter(projects::Column::Id.is_in(owned))
                .exec(&txn)
                .await?;
        }

        // Assigned tasks survive with the assignment cleared.
        tasks::Entity::update_many()
            .col_expr(tasks::Column::AssignedTo, Expr::value(Option::<Uuid>::None))
            .filter(tasks::Column::AssignedTo.eq(id))
            .exec(&txn)
            .await?;

        comments::Entity::delete_many()
            .filter(comments::Column::AuthorId.eq(id))
            .exec(&txn)
            .await?;
        project_members::Entity::delete_many()
            .filter(project_members::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        profiles::Entity::delete_many()
            .filter(profiles::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let res = users::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("users delete failed")?;

        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }

    async fn find_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let found = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(self.conn())
            .await
            .context("profile lookup failed")?;
        Ok(found.map(mapper::profile_to_contract))
    }

    async fn upsert_profile(&self, profile: Profile) -> anyhow::Result<()> {
        let existing = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(profile.user_id))
            .one(self.conn())
            .await
            .context("profile lookup failed")?;

        let m = profiles::ActiveModel {
            id: Set(profile.id),
            user_id: Set(profile.user_id),
            bio: Set(profile.bio),
            avatar_ref: Set(profile.avatar_ref),
        };
        if existing.is_some() {
            m.update(self.conn())
                .await
                .context("profile update failed")?;
        } else {
            m.insert(self.conn())
                .await
                .context("profile insert failed")?;
        }
        Ok(())
    }
}
