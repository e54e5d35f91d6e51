//! Comment mutations and reads.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::error::TrackerError;
use crate::contract::model::{Comment, CommentDetails, NewComment};

use super::{require_non_blank, storage_error, Service};

impl Service {
    /// Create a comment. The author is always `actor`.
    #[instrument(
        name = "tracker.service.create_comment",
        skip(self, input),
        fields(actor = %actor, task_id = %input.task_id)
    )]
    pub async fn create_comment(
        &self,
        actor: Uuid,
        input: NewComment,
    ) -> Result<CommentDetails, TrackerError> {
        info!("Creating comment");

        require_non_blank("content", &input.content)?;
        self.require_task(input.task_id).await?;
        let author = self.get_user(actor).await?;

        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: input.task_id,
            author_id: actor,
            content: input.content,
            created_at: Utc::now(),
        };

        self.comments
            .insert(comment.clone())
            .await
            .map_err(storage_error)?;

        info!("Created comment id={}", comment.id);
        Ok(CommentDetails { comment, author })
    }

    /// Update a comment's content. Author and task binding are immutable.
    #[instrument(name = "tracker.service.update_comment", skip(self, content), fields(comment_id = %id))]
    pub async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<CommentDetails, TrackerError> {
        info!("Updating comment");

        require_non_blank("content", &content)?;
        let mut comment = self.require_comment(id).await?;
        comment.content = content;

        self.comments
            .update(comment.clone())
            .await
            .map_err(storage_error)?;

        let author = self.get_user(comment.author_id).await?;
        Ok(CommentDetails { comment, author })
    }

    #[instrument(name = "tracker.service.delete_comment", skip(self), fields(comment_id = %id))]
    pub async fn delete_comment(&self, id: Uuid) -> Result<(), TrackerError> {
        info!("Deleting comment");
        let deleted = self.comments.delete(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(TrackerError::not_found("Comment", id));
        }
        Ok(())
    }

    pub async fn comment_details(&self, id: Uuid) -> Result<CommentDetails, TrackerError> {
        let comment = self.require_comment(id).await?;
        let author = self.get_user(comment.author_id).await?;
        Ok(CommentDetails { comment, author })
    }

    pub async fn list_comment_details(&self) -> Result<Vec<CommentDetails>, TrackerError> {
        let comments = self.comments.list().await.map_err(storage_error)?;
        self.assemble_comment_details(comments).await
    }

    /// All comments on a task. Read is not membership-checked; the task id
    /// itself must resolve.
    #[instrument(name = "tracker.service.task_comments", skip(self), fields(task_id = %task_id))]
    pub async fn task_comments(&self, task_id: Uuid) -> Result<Vec<CommentDetails>, TrackerError> {
        self.require_task(task_id).await?;
        let comments = self
            .comments
            .list_by_task(task_id)
            .await
            .map_err(storage_error)?;
        self.assemble_comment_details(comments).await
    }

    /// Newest comments, `created_at` descending, at most `limit`.
    #[instrument(name = "tracker.service.recent_comments", skip(self))]
    pub async fn recent_comments(&self, limit: u64) -> Result<Vec<CommentDetails>, TrackerError> {
        let comments = self.comments.recent(limit).await.map_err(storage_error)?;
        self.assemble_comment_details(comments).await
    }

    async fn require_comment(&self, id: Uuid) -> Result<Comment, TrackerError> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TrackerError::not_found("Comment", id))
    }
}
