//! Comment thread service

use chrono::Utc;
use discover_core::events::{CommentAddedEvent, CommentDeletedEvent};
use discover_core::{normalize_comment_text, Comment, FeedEvent, Snowflake, UserKey};
use tracing::{info, instrument};

use super::access::require_owner_or_admin;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comments shown under a card before "view all"
pub const DEFAULT_COMMENT_LIMIT: usize = 3;
/// Upper bound used by "view all"
pub const VIEW_ALL_COMMENT_LIMIT: usize = 100;

/// One listing of a block's comments, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPage {
    pub block_id: Snowflake,
    pub comments: Vec<Comment>,
    pub show_all: bool,
    /// A full collapsed page came back, so more may exist
    pub can_view_all: bool,
}

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a comment; `Ok(None)` when signed out or the text is blank
    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        viewer: Option<&UserKey>,
        block_id: Snowflake,
        text: &str,
    ) -> ServiceResult<Option<Comment>> {
        let Some(author) = viewer else {
            return Ok(None);
        };
        let Some(text) = normalize_comment_text(text) else {
            return Ok(None);
        };

        if self.ctx.block_repo().find_by_id(block_id).await?.is_none() {
            return Err(ServiceError::not_found("Block", block_id));
        }

        let comment = Comment::new(self.ctx.generate_id(), block_id, author.clone(), text);
        self.ctx.comment_repo().create(&comment).await?;

        info!(block_id = %block_id, comment_id = %comment.id, author = %author, "Comment added");

        self.ctx
            .publish(FeedEvent::CommentAdded(CommentAddedEvent {
                block_id,
                comment_id: comment.id,
                author: author.clone(),
                timestamp: comment.created_at,
            }))
            .await;

        Ok(Some(comment))
    }

    /// Newest `limit` comments
    pub async fn list_comments(
        &self,
        block_id: Snowflake,
        limit: usize,
        show_all: bool,
    ) -> ServiceResult<CommentPage> {
        let limit = limit.max(1);
        let comments = self.ctx.comment_repo().list_recent(block_id, limit).await?;
        let can_view_all = !show_all && comments.len() == limit;

        Ok(CommentPage {
            block_id,
            comments,
            show_all,
            can_view_all,
        })
    }

    /// Collapsed listing shown under a card
    pub async fn first_page(&self, block_id: Snowflake) -> ServiceResult<CommentPage> {
        self.list_comments(block_id, DEFAULT_COMMENT_LIMIT, false)
            .await
    }

    pub async fn view_all(&self, block_id: Snowflake) -> ServiceResult<CommentPage> {
        self.list_comments(block_id, VIEW_ALL_COMMENT_LIMIT, true)
            .await
    }

    /// Replace a comment's text; author or admin only
    #[instrument(skip(self, text))]
    pub async fn edit_comment(
        &self,
        viewer: &UserKey,
        block_id: Snowflake,
        comment_id: Snowflake,
        text: &str,
    ) -> ServiceResult<Comment> {
        let mut comment = self.load(block_id, comment_id).await?;
        require_owner_or_admin(self.ctx, viewer, &comment.author, "edit this comment")?;

        let text = normalize_comment_text(text)
            .ok_or_else(|| ServiceError::validation("Comment text cannot be empty"))?;
        comment.edit(text);
        self.ctx.comment_repo().update(&comment).await?;

        info!(block_id = %block_id, comment_id = %comment_id, editor = %viewer, "Comment edited");
        Ok(comment)
    }

    /// Remove a comment; author or admin only
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        viewer: &UserKey,
        block_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        let comment = self.load(block_id, comment_id).await?;
        require_owner_or_admin(self.ctx, viewer, &comment.author, "delete this comment")?;

        self.ctx.comment_repo().delete(block_id, comment_id).await?;
        info!(block_id = %block_id, comment_id = %comment_id, by = %viewer, "Comment deleted");

        self.ctx
            .publish(FeedEvent::CommentDeleted(CommentDeletedEvent {
                block_id,
                comment_id,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    async fn load(&self, block_id: Snowflake, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(block_id, comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestEnv;

    async fn post_many(env: &TestEnv, block_id: Snowflake, n: usize) {
        let svc = CommentService::new(&env.ctx);
        for i in 0..n {
            svc.add_comment(Some(&env.bob), block_id, &format!("comment {i}"))
                .await
                .unwrap()
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_add_requires_viewer_and_text() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let svc = CommentService::new(&env.ctx);

        assert!(svc.add_comment(None, block.id, "hi").await.unwrap().is_none());
        assert!(svc
            .add_comment(Some(&env.bob), block.id, "   \n ")
            .await
            .unwrap()
            .is_none());

        let comment = svc
            .add_comment(Some(&env.bob), block.id, "  hello  ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(comment.text, "hello");
        assert_eq!(env.events.types(), ["COMMENT_ADDED"]);
    }

    #[tokio::test]
    async fn test_comment_on_missing_block() {
        let env = TestEnv::new();
        let err = CommentService::new(&env.ctx)
            .add_comment(Some(&env.bob), Snowflake::new(1), "hi")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_listing_limits_and_view_all() {
        let env = TestEnv::new();
        let svc = CommentService::new(&env.ctx);

        let few = env.seed_block(&env.alice, "few").await;
        post_many(&env, few.id, 2).await;
        let page = svc.first_page(few.id).await.unwrap();
        assert_eq!(page.comments.len(), 2);
        assert!(!page.can_view_all);

        let many = env.seed_block(&env.alice, "many").await;
        post_many(&env, many.id, 5).await;
        let page = svc.first_page(many.id).await.unwrap();
        let texts: Vec<_> = page.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["comment 4", "comment 3", "comment 2"]);
        assert!(page.can_view_all);

        let all = svc.view_all(many.id).await.unwrap();
        assert_eq!(all.comments.len(), 5);
        assert!(all.show_all);
        assert!(!all.can_view_all);
    }

    #[tokio::test]
    async fn test_exactly_limit_offers_view_all() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        post_many(&env, block.id, 3).await;

        let page = CommentService::new(&env.ctx).first_page(block.id).await.unwrap();
        assert_eq!(page.comments.len(), 3);
        assert!(page.can_view_all);
    }

    #[tokio::test]
    async fn test_edit_and_delete_permissions() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let svc = CommentService::new(&env.ctx);
        let comment = svc
            .add_comment(Some(&env.bob), block.id, "original")
            .await
            .unwrap()
            .unwrap();

        let err = svc
            .edit_comment(&env.alice, block.id, comment.id, "hijack")
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());

        let edited = svc
            .edit_comment(&env.bob, block.id, comment.id, "fixed")
            .await
            .unwrap();
        assert_eq!(edited.text, "fixed");
        assert!(edited.is_edited());

        let err = svc
            .delete_comment(&env.alice, block.id, comment.id)
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());

        svc.delete_comment(&env.admin, block.id, comment.id)
            .await
            .unwrap();
        assert!(svc.first_page(block.id).await.unwrap().comments.is_empty());
        assert_eq!(env.events.types(), ["COMMENT_ADDED", "COMMENT_DELETED"]);
    }

    #[tokio::test]
    async fn test_blank_edit_rejected() {
        let env = TestEnv::new();
        let block = env.seed_block(&env.alice, "post").await;
        let svc = CommentService::new(&env.ctx);
        let comment = svc
            .add_comment(Some(&env.bob), block.id, "text")
            .await
            .unwrap()
            .unwrap();

        let err = svc
            .edit_comment(&env.bob, block.id, comment.id, "  ")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
