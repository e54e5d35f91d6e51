//! Project mutations and reads.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::{NewProject, Project, ProjectDetails, ProjectPatch, User};

use super::{dedup_ids, require_non_blank, storage_error, Service};

impl Service {
    /// Create a project. The owner is always `actor` — client-supplied owner
    /// fields never reach this call. `member_ids` is the complete member set.
    #[instrument(
        name = "tracker.service.create_project",
        skip(self, input),
        fields(actor = %actor, name = %input.name)
    )]
    pub async fn create_project(
        &self,
        actor: Uuid,
        input: NewProject,
    ) -> Result<ProjectDetails, TrackerError> {
        info!("Creating project");

        require_non_blank("name", &input.name)?;
        // The owner must resolve; a stale token is not an internal error.
        self.get_user(actor).await?;
        let member_ids = dedup_ids(input.member_ids.into_iter());
        self.require_users_exist(&member_ids).await?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            owner_id: actor,
            created_at: now,
            updated_at: now,
            is_active: input.is_active,
        };

        self.projects
            .insert(project.clone(), &member_ids)
            .await
            .map_err(storage_error)?;

        info!("Created project id={}", project.id);
        self.project_details(project.id).await
    }

    /// Partial update. Supplying `member_ids` replaces the member set
    /// wholesale; the owner is never mutable through this call.
    #[instrument(
        name = "tracker.service.update_project",
        skip(self, patch),
        fields(project_id = %id)
    )]
    pub async fn update_project(
        &self,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<ProjectDetails, TrackerError> {
        info!("Updating project");

        let mut project = self.require_project(id).await?;

        if let Some(ref name) = patch.name {
            require_non_blank("name", name)?;
        }
        if let Some(ref member_ids) = patch.member_ids {
            self.require_users_exist(member_ids).await?;
        }

        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(is_active) = patch.is_active {
            project.is_active = is_active;
        }
        project.updated_at = Utc::now();

        self.projects
            .update(project.clone())
            .await
            .map_err(storage_error)?;
        if let Some(member_ids) = patch.member_ids {
            let member_ids = dedup_ids(member_ids.into_iter());
            self.projects
                .set_members(id, &member_ids)
                .await
                .map_err(storage_error)?;
        }

        self.project_details(id).await
    }

    /// Delete a project and its full task tree. Returns false when the
    /// project was already absent — the only delete that tolerates a no-op,
    /// so both projections can surface it as `ok=false`/404 respectively.
    #[instrument(name = "tracker.service.delete_project", skip(self), fields(project_id = %id))]
    pub async fn delete_project(&self, id: Uuid) -> Result<bool, TrackerError> {
        info!("Deleting project");
        self.projects.delete(id).await.map_err(storage_error)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, TrackerError> {
        self.require_project(id).await
    }

    /// `active_only`: None lists all projects.
    pub async fn list_projects(
        &self,
        active_only: Option<bool>,
    ) -> Result<Vec<Project>, TrackerError> {
        self.projects.list(active_only).await.map_err(storage_error)
    }

    #[instrument(name = "tracker.service.project_details", skip(self), fields(project_id = %id))]
    pub async fn project_details(&self, id: Uuid) -> Result<ProjectDetails, TrackerError> {
        let project = self.require_project(id).await?;
        let mut details = self.assemble_project_details(vec![project]).await?;
        // One input row always produces exactly one detail row.
        details
            .pop()
            .ok_or_else(|| TrackerError::internal("project details assembly produced no row"))
    }

    #[instrument(name = "tracker.service.list_project_details", skip(self))]
    pub async fn list_project_details(
        &self,
        active_only: Option<bool>,
    ) -> Result<Vec<ProjectDetails>, TrackerError> {
        let projects = self.list_projects(active_only).await?;
        debug!("Assembling details for {} projects", projects.len());
        self.assemble_project_details(projects).await
    }

    async fn assemble_project_details(
        &self,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectDetails>, TrackerError> {
        let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();

        let owner_ids = dedup_ids(projects.iter().map(|p| p.owner_id));
        let owners = self
            .users
            .find_many(&owner_ids)
            .await
            .map_err(storage_error)?;
        let owners: HashMap<Uuid, User> = owners.into_iter().map(|u| (u.id, u)).collect();

        let mut members_by_project: HashMap<Uuid, Vec<User>> = HashMap::new();
        for (project_id, member) in self
            .projects
            .members_for(&project_ids)
            .await
            .map_err(storage_error)?
        {
            members_by_project
                .entry(project_id)
                .or_default()
                .push(member);
        }

        let tasks = self
            .tasks
            .list_by_projects(&project_ids)
            .await
            .map_err(storage_error)?;
        let task_details = self.assemble_task_details(tasks).await?;
        let mut tasks_by_project: HashMap<Uuid, Vec<_>> = HashMap::new();
        for detail in task_details {
            tasks_by_project
                .entry(detail.task.project_id)
                .or_default()
                .push(detail);
        }

        projects
            .into_iter()
            .map(|project| {
                let owner = owners.get(&project.owner_id).cloned().ok_or_else(|| {
                    TrackerError::integrity(format!(
                        "project {} references missing owner {}",
                        project.id, project.owner_id
                    ))
                })?;
                let members = members_by_project.remove(&project.id).unwrap_or_default();
                let tasks = tasks_by_project.remove(&project.id).unwrap_or_default();
                Ok(ProjectDetails {
                    project,
                    owner,
                    members,
                    tasks,
                })
            })
            .collect()
    }

    pub(crate) async fn require_project(&self, id: Uuid) -> Result<Project, TrackerError> {
        self.projects
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TrackerError::not_found("Project", id))
    }

    pub(crate) async fn require_users_exist(&self, ids: &[Uuid]) -> Result<(), TrackerError> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self.users.find_many(ids).await.map_err(storage_error)?;
        if found.len() != dedup_ids(ids.iter().copied()).len() {
            let found_ids: std::collections::HashSet<Uuid> =
                found.into_iter().map(|u| u.id).collect();
            let missing = ids
                .iter()
                .find(|id| !found_ids.contains(id))
                .copied()
                .unwrap_or_default();
            return Err(TrackerError::not_found("User", missing));
        }
        Ok(())
    }
}
