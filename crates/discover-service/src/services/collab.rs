//! Collab post service - calls for collaborators, owner or admin managed

use discover_common::AppError;
use discover_core::{CollabPost, Snowflake, UserKey};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{CreateCollabPostRequest, UpdateCollabPostRequest};

use super::access::require_owner_or_admin;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_COLLAB_LIMIT: usize = 50;
const MAX_COLLAB_LIMIT: usize = 200;

pub struct CollabPostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CollabPostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Newest posts first
    pub async fn list_posts(&self, limit: Option<usize>) -> ServiceResult<Vec<CollabPost>> {
        let limit = limit
            .unwrap_or(DEFAULT_COLLAB_LIMIT)
            .clamp(1, MAX_COLLAB_LIMIT);
        Ok(self.ctx.collab_repo().list(limit).await?)
    }

    pub async fn get_post(&self, post_id: Snowflake) -> ServiceResult<CollabPost> {
        self.ctx
            .collab_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Collab post", post_id))
    }

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        viewer: Option<&UserKey>,
        request: CreateCollabPostRequest,
    ) -> ServiceResult<CollabPost> {
        let owner = viewer.ok_or(AppError::MissingAuth)?;
        request.validate()?;

        let mut post = CollabPost::new(
            self.ctx.generate_id(),
            owner.clone(),
            request.title.trim().to_string(),
            request.description,
        );
        post.link = request.link.filter(|l| !l.trim().is_empty());

        self.ctx.collab_repo().create(&post).await?;
        info!(post_id = %post.id, owner = %owner, "Collab post created");
        Ok(post)
    }

    #[instrument(skip(self, request))]
    pub async fn update_post(
        &self,
        viewer: &UserKey,
        post_id: Snowflake,
        request: UpdateCollabPostRequest,
    ) -> ServiceResult<CollabPost> {
        request.validate()?;
        let mut post = self.get_post(post_id).await?;
        require_owner_or_admin(self.ctx, viewer, &post.owner, "edit this post")?;

        if let Some(title) = request.title {
            post.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            post.description = description;
        }
        if let Some(link) = request.link {
            post.link = Some(link).filter(|l| !l.trim().is_empty());
        }

        self.ctx.collab_repo().update(&post).await?;
        info!(post_id = %post_id, editor = %viewer, "Collab post updated");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, viewer: &UserKey, post_id: Snowflake) -> ServiceResult<()> {
        let post = self.get_post(post_id).await?;
        require_owner_or_admin(self.ctx, viewer, &post.owner, "delete this post")?;

        self.ctx.collab_repo().delete(post_id).await?;
        info!(post_id = %post_id, by = %viewer, "Collab post deleted");
        Ok(())
    }
}
