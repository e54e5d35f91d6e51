//! Ports for the domain layer: the persistence operations the services need.
//!
//! Implementations own referential cleanup: deletes take the documented
//! cascade closure with them (Project → Task → Comment/Attachment; a user
//! delete nullifies task assignments instead of deleting the tasks) inside a
//! single transaction. The service layer never orchestrates partial deletes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{
    Attachment, Comment, Profile, Project, ProjectCommentCount, ProjectTaskCount, StatusCount,
    Task, TaskStatus, User,
};

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>>;
    /// Load a user together with the stored password hash, for login.
    async fn find_for_login(&self, username: &str) -> anyhow::Result<Option<(User, String)>>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    /// Service computes id/timestamps/hash; repo persists.
    async fn insert(&self, user: User, password_hash: String) -> anyhow::Result<()>;
    /// Delete with full closure: owned projects (and their task trees),
    /// authored comments, memberships and profile go too; assigned tasks are
    /// nullified, not deleted. Returns false when the user was absent.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn find_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn upsert_profile(&self, profile: Profile) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ProjectsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Project>>;
    /// `active_only`: None = all, Some(b) filters on `is_active == b`.
    async fn list(&self, active_only: Option<bool>) -> anyhow::Result<Vec<Project>>;
    async fn insert(&self, project: Project, member_ids: &[Uuid]) -> anyhow::Result<()>;
    async fn update(&self, project: Project) -> anyhow::Result<()>;
    /// Replace the member set wholesale.
    async fn set_members(&self, project_id: Uuid, member_ids: &[Uuid]) -> anyhow::Result<()>;
    /// Membership rows for a batch of projects, as (project_id, member).
    async fn members_for(&self, project_ids: &[Uuid]) -> anyhow::Result<Vec<(Uuid, User)>>;
    /// Cascade closure; returns false when the project was absent.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Per-project task counts, including projects with zero tasks.
    async fn task_counts(&self) -> anyhow::Result<Vec<ProjectTaskCount>>;
    /// Per-project comment totals across the project's tasks, including zero.
    async fn comment_counts(&self) -> anyhow::Result<Vec<ProjectCommentCount>>;
}

#[async_trait]
pub trait TasksRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>>;
    async fn list(&self) -> anyhow::Result<Vec<Task>>;
    async fn list_by_projects(&self, project_ids: &[Uuid]) -> anyhow::Result<Vec<Task>>;
    async fn list_by_status(&self, status: TaskStatus) -> anyhow::Result<Vec<Task>>;
    async fn list_by_assignee(&self, user_id: Uuid) -> anyhow::Result<Vec<Task>>;
    /// Newest first by `created_at`, id ascending on equal timestamps.
    async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Task>>;
    async fn insert(&self, task: Task) -> anyhow::Result<()>;
    async fn update(&self, task: Task) -> anyhow::Result<()>;
    /// Deletes the task's comments and attachments too.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// `{status, count}` for statuses with at least one task.
    async fn status_summary(&self) -> anyhow::Result<Vec<StatusCount>>;
}

#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Comment>>;
    async fn list(&self) -> anyhow::Result<Vec<Comment>>;
    async fn list_by_task(&self, task_id: Uuid) -> anyhow::Result<Vec<Comment>>;
    async fn list_by_tasks(&self, task_ids: &[Uuid]) -> anyhow::Result<Vec<Comment>>;
    /// Newest first by `created_at`, id ascending on equal timestamps.
    async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Comment>>;
    async fn insert(&self, comment: Comment) -> anyhow::Result<()>;
    async fn update(&self, comment: Comment) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait AttachmentsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Attachment>>;
    async fn list(&self) -> anyhow::Result<Vec<Attachment>>;
    async fn list_by_tasks(&self, task_ids: &[Uuid]) -> anyhow::Result<Vec<Attachment>>;
    async fn insert(&self, attachment: Attachment) -> anyhow::Result<()>;
    async fn update(&self, attachment: Attachment) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
