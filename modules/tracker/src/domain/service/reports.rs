//! Aggregate reporting queries.

use tracing::instrument;

use crate::contract::error::TrackerError;
use crate::contract::model::{ProjectCommentCount, ProjectTaskCount, StatusCount};

use super::{storage_error, Service};

impl Service {
    /// Per-project task counts, including projects with zero tasks.
    #[instrument(name = "tracker.service.projects_with_task_count", skip(self))]
    pub async fn projects_with_task_count(&self) -> Result<Vec<ProjectTaskCount>, TrackerError> {
        self.projects.task_counts().await.map_err(storage_error)
    }

    /// Per-project comment totals across all of the project's tasks.
    #[instrument(name = "tracker.service.projects_with_comment_count", skip(self))]
    pub async fn projects_with_comment_count(
        &self,
    ) -> Result<Vec<ProjectCommentCount>, TrackerError> {
        self.projects.comment_counts().await.map_err(storage_error)
    }

    /// `{status, count}` for every status with at least one task; statuses
    /// with zero tasks are omitted.
    #[instrument(name = "tracker.service.task_status_summary", skip(self))]
    pub async fn task_status_summary(&self) -> Result<Vec<StatusCount>, TrackerError> {
        self.tasks.status_summary().await.map_err(storage_error)
    }

    /// Mean of per-project task counts; None when there are no projects.
    #[instrument(name = "tracker.service.average_tasks_per_project", skip(self))]
    pub async fn average_tasks_per_project(&self) -> Result<Option<f64>, TrackerError> {
        let counts = self.projects.task_counts().await.map_err(storage_error)?;
        if counts.is_empty() {
            return Ok(None);
        }
        let total: i64 = counts.iter().map(|c| c.task_count).sum();
        Ok(Some(total as f64 / counts.len() as f64))
    }
}
