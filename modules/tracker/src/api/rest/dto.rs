//! REST wire shapes and their mapping to contract models.
//!
//! The read/write asymmetry of the original API is modeled as two distinct
//! schema families: `*Input` types accept raw ids on write, `*View` types
//! nest related objects on read. Specifically, `ProjectView` nests owner and
//! members as user objects, `TaskView` nests the assignee but keeps `project`
//! as a raw id, and `CommentView` renders the author as a bare username.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::contract::model::{
    Attachment, CommentDetails, NewComment, NewProject, NewTask, Profile, ProjectCommentCount,
    ProjectDetails, ProjectPatch, ProjectTaskCount, StatusCount, TaskDetails, TaskPatch,
    TaskStatus, User,
};

/// Deserialize a present-but-null JSON field into `Some(None)`, so PATCH
/// bodies can distinguish "clear this field" from "leave it alone".
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// --- status -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatusDto {
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "INPR")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl From<TaskStatus> for TaskStatusDto {
    fn from(s: TaskStatus) -> Self {
        match s {
            TaskStatus::Todo => TaskStatusDto::Todo,
            TaskStatus::InProgress => TaskStatusDto::InProgress,
            TaskStatus::Done => TaskStatusDto::Done,
        }
    }
}

impl From<TaskStatusDto> for TaskStatus {
    fn from(s: TaskStatusDto) -> Self {
        match s {
            TaskStatusDto::Todo => TaskStatus::Todo,
            TaskStatusDto::InProgress => TaskStatus::InProgress,
            TaskStatusDto::Done => TaskStatus::Done,
        }
    }
}

// --- views ------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub user: UserView,
    pub bio: String,
    pub avatar: Option<String>,
}

impl ProfileView {
    pub fn from_parts(profile: Profile, user: User) -> Self {
        Self {
            id: profile.id,
            user: user.into(),
            bio: profile.bio,
            avatar: profile.avatar_ref,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    /// Raw task id, as the original serializer exposed it.
    pub task: Uuid,
    /// Author's username; the id is deliberately not part of this view.
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentDetails> for CommentView {
    fn from(d: CommentDetails) -> Self {
        Self {
            id: d.comment.id,
            content: d.comment.content,
            task: d.comment.task_id,
            author: d.author.username,
            created_at: d.comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentView {
    pub id: Uuid,
    pub task: Uuid,
    /// Opaque blob key; fetch the bytes via the download endpoint.
    pub file: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentView {
    fn from(a: Attachment) -> Self {
        Self {
            id: a.id,
            task: a.task_id,
            file: a.file_ref,
            uploaded_at: a.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: Uuid,
    /// Raw project id even on read; only the assignee is nested.
    pub project: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Option<UserView>,
    pub status: TaskStatusDto,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
    pub attachments: Vec<AttachmentView>,
}

impl From<TaskDetails> for TaskView {
    fn from(d: TaskDetails) -> Self {
        Self {
            id: d.task.id,
            project: d.task.project_id,
            title: d.task.title,
            description: d.task.description,
            assigned_to: d.assignee.map(Into::into),
            status: d.task.status.into(),
            due_date: d.task.due_date,
            created_at: d.task.created_at,
            comments: d.comments.into_iter().map(Into::into).collect(),
            attachments: d.attachments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: UserView,
    pub members: Vec<UserView>,
    pub tasks: Vec<TaskView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<ProjectDetails> for ProjectView {
    fn from(d: ProjectDetails) -> Self {
        Self {
            id: d.project.id,
            name: d.project.name,
            description: d.project.description,
            owner: d.owner.into(),
            members: d.members.into_iter().map(Into::into).collect(),
            tasks: d.tasks.into_iter().map(Into::into).collect(),
            created_at: d.project.created_at,
            updated_at: d.project.updated_at,
            is_active: d.project.is_active,
        }
    }
}

// --- aggregate views --------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTaskCountView {
    pub id: Uuid,
    pub name: String,
    pub task_count: i64,
}

impl From<ProjectTaskCount> for ProjectTaskCountView {
    fn from(c: ProjectTaskCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            task_count: c.task_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCommentCountView {
    pub id: Uuid,
    pub name: String,
    pub comment_count: i64,
}

impl From<ProjectCommentCount> for ProjectCommentCountView {
    fn from(c: ProjectCommentCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            comment_count: c.comment_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSummaryEntry {
    pub status: TaskStatusDto,
    pub count: i64,
}

impl From<StatusCount> for StatusSummaryEntry {
    fn from(c: StatusCount) -> Self {
        Self {
            status: c.status.into(),
            count: c.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageView {
    pub avg: Option<f64>,
}

// --- auth wire types --------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenView {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshInput {
    pub refresh: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenView {
    pub access: String,
}

// --- write inputs -----------------------------------------------------------

/// Create/PUT body for projects. There is no owner field: ownership comes
/// from the acting identity, and unknown fields in the payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Raw member ids; replaces the member set wholesale.
    #[serde(default)]
    pub members: Option<Vec<Uuid>>,
}

impl From<ProjectInput> for NewProject {
    fn from(input: ProjectInput) -> Self {
        Self {
            name: input.name,
            description: input.description.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
            member_ids: input.members.unwrap_or_default(),
        }
    }
}

impl From<ProjectInput> for ProjectPatch {
    fn from(input: ProjectInput) -> Self {
        Self {
            name: Some(input.name),
            description: input.description,
            is_active: input.is_active,
            member_ids: input.members,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectPatchInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub members: Option<Vec<Uuid>>,
}

impl From<ProjectPatchInput> for ProjectPatch {
    fn from(input: ProjectPatchInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            is_active: input.is_active,
            member_ids: input.members,
        }
    }
}

/// Create/PUT body for tasks; relations are raw ids.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project: Uuid,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TaskStatusDto>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl From<TaskInput> for NewTask {
    fn from(input: TaskInput) -> Self {
        Self {
            title: input.title,
            project_id: input.project,
            description: input.description.unwrap_or_default(),
            assigned_to: input.assigned_to,
            status: input.status.map(Into::into).unwrap_or(TaskStatus::Todo),
            due_date: input.due_date,
        }
    }
}

impl From<TaskInput> for TaskPatch {
    fn from(input: TaskInput) -> Self {
        // PUT semantics: every field is written, absent optionals clear.
        Self {
            title: Some(input.title),
            description: Some(input.description.unwrap_or_default()),
            status: Some(input.status.map(Into::into).unwrap_or(TaskStatus::Todo)),
            project_id: Some(input.project),
            assigned_to: Some(input.assigned_to),
            due_date: Some(input.due_date),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaskPatchInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatusDto>,
    pub project: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl From<TaskPatchInput> for TaskPatch {
    fn from(input: TaskPatchInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            status: input.status.map(Into::into),
            project_id: input.project,
            assigned_to: input.assigned_to,
            due_date: input.due_date,
        }
    }
}

/// Create body for comments; the author is the acting identity, any
/// client-supplied author field is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub content: String,
    pub task: Uuid,
}

impl From<CommentInput> for NewComment {
    fn from(input: CommentInput) -> Self {
        Self {
            content: input.content,
            task_id: input.task,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentUpdateInput {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPatchInput {
    pub task: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

// --- query params -----------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ByStatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ByUserQuery {
    pub user_id: Option<Uuid>,
}
