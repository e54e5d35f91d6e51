//! Conversions between storage entities and contract models.

use anyhow::{anyhow, Result};

use crate::contract::model::{Attachment, Comment, Profile, Project, Task, TaskStatus, User};
use crate::infra::storage::entity;

pub fn user_to_contract(m: entity::users::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        created_at: m.created_at,
    }
}

pub fn profile_to_contract(m: entity::profiles::Model) -> Profile {
    Profile {
        id: m.id,
        user_id: m.user_id,
        bio: m.bio,
        avatar_ref: m.avatar_ref,
    }
}

pub fn project_to_contract(m: entity::projects::Model) -> Project {
    Project {
        id: m.id,
        name: m.name,
        description: m.description,
        owner_id: m.owner_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
        is_active: m.is_active,
    }
}

/// Fails on an unknown stored status value; that is corrupt data, not a
/// caller mistake.
pub fn task_to_contract(m: entity::tasks::Model) -> Result<Task> {
    let status: TaskStatus = m
        .status
        .parse()
        .map_err(|()| anyhow!("task {} has unknown status '{}'", m.id, m.status))?;
    Ok(Task {
        id: m.id,
        project_id: m.project_id,
        title: m.title,
        description: m.description,
        assigned_to: m.assigned_to,
        status,
        due_date: m.due_date,
        created_at: m.created_at,
    })
}

pub fn comment_to_contract(m: entity::comments::Model) -> Comment {
    Comment {
        id: m.id,
        task_id: m.task_id,
        author_id: m.author_id,
        content: m.content,
        created_at: m.created_at,
    }
}

pub fn attachment_to_contract(m: entity::attachments::Model) -> Attachment {
    Attachment {
        id: m.id,
        task_id: m.task_id,
        file_ref: m.file_ref,
        uploaded_at: m.uploaded_at,
    }
}
