//! Pure domain models (no serde); the API projections own their own wire
//! shapes and map explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Registration data; the password is hashed before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Optional one-to-one profile for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: String,
    /// Opaque blob-store key for the avatar image.
    pub avatar_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Immutable after creation; always the acting identity at create time.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub member_ids: Vec<Uuid>,
}

impl Default for NewProject {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            is_active: true,
            member_ids: Vec::new(),
        }
    }
}

/// Partial update; `member_ids`, when present, replaces the member set
/// wholesale. The owner is never patchable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub member_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Wire/storage representation ("TODO", "INPR", "DONE").
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "INPR",
            TaskStatus::Done => "DONE",
        }
    }

    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "INPR" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub project_id: Uuid,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

/// Partial task update. The nested options on `assigned_to` and `due_date`
/// distinguish "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub project_id: Option<Uuid>,
    pub assigned_to: Option<Option<Uuid>>,
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Immutable once created.
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
    pub task_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Opaque blob-store key.
    pub file_ref: String,
    pub uploaded_at: DateTime<Utc>,
}

// --- read-side composites -------------------------------------------------

/// A comment together with its resolved author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: User,
}

/// A task with its assignee, comments and attachments resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub task: Task,
    pub assignee: Option<User>,
    pub comments: Vec<CommentDetails>,
    pub attachments: Vec<Attachment>,
}

/// A project with owner, members and tasks resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub project: Project,
    pub owner: User,
    pub members: Vec<User>,
    pub tasks: Vec<TaskDetails>,
}

// --- aggregate rows -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTaskCount {
    pub id: Uuid,
    pub name: String,
    pub task_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCommentCount {
    pub id: Uuid,
    pub name: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}
