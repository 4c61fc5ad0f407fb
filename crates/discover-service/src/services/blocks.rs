//! Block service
//!
//! Create, read, update and delete feed blocks. Deleting a block also removes
//! the stored images it references, as long as they sit under the block
//! owner's upload prefix.

use chrono::Utc;
use discover_common::AppError;
use discover_core::events::BlockDeletedEvent;
use discover_core::{Block, BlockKind, FeedEvent, Snowflake, StorageUrl, UserKey};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateBlockRequest, UpdateBlockRequest};

use super::access::require_owner_or_admin;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::storage::owner_prefix;

pub struct BlockService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BlockService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a block owned by the viewer
    #[instrument(skip(self, request))]
    pub async fn create_block(
        &self,
        viewer: Option<&UserKey>,
        request: CreateBlockRequest,
    ) -> ServiceResult<Block> {
        let owner = viewer.ok_or(AppError::MissingAuth)?;
        request.validate()?;
        let kind = BlockKind::parse(&request.block_type)?;

        let mut block = Block::new(
            self.ctx.generate_id(),
            owner.clone(),
            request.title.trim().to_string(),
            request.description,
        );
        block.kind = kind;
        block.link = non_empty(request.link);
        block.icon = non_empty(request.icon);
        block.image = non_empty(request.image);
        block.slides = request.slides.into_iter().filter(|s| !s.is_empty()).collect();

        self.ctx.block_repo().create(&block).await?;
        info!(block_id = %block.id, owner = %owner, kind = kind.as_str(), "Block created");

        Ok(block)
    }

    #[instrument(skip(self))]
    pub async fn get_block(&self, block_id: Snowflake) -> ServiceResult<Block> {
        self.ctx
            .block_repo()
            .find_by_id(block_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Block", block_id))
    }

    /// Edit content fields; vote counters are never touched here
    #[instrument(skip(self, request))]
    pub async fn update_block(
        &self,
        viewer: &UserKey,
        block_id: Snowflake,
        request: UpdateBlockRequest,
    ) -> ServiceResult<Block> {
        request.validate()?;
        let mut block = self.get_block(block_id).await?;
        require_owner_or_admin(self.ctx, viewer, &block.owner, "edit this block")?;

        let before: Vec<String> = block.media_refs().map(str::to_string).collect();

        if let Some(title) = request.title {
            block.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            block.description = description;
        }
        if let Some(link) = request.link {
            block.link = non_empty(Some(link));
        }
        if let Some(raw) = request.block_type {
            block.kind = BlockKind::parse(&raw)?;
        }
        if let Some(icon) = request.icon {
            block.icon = non_empty(Some(icon));
        }
        if let Some(image) = request.image {
            block.image = non_empty(Some(image));
        }
        if let Some(slides) = request.slides {
            block.slides = slides.into_iter().filter(|s| !s.is_empty()).collect();
        }

        self.ctx.block_repo().update(&block).await?;
        info!(block_id = %block_id, editor = %viewer, "Block updated");

        let dropped: Vec<String> = before
            .into_iter()
            .filter(|old| !block.media_refs().any(|r| r == old))
            .collect();
        self.delete_media(&block, dropped.iter().map(String::as_str))
            .await;

        Ok(block)
    }

    /// Remove a block with its votes, comments and stored images
    #[instrument(skip(self))]
    pub async fn delete_block(&self, viewer: &UserKey, block_id: Snowflake) -> ServiceResult<()> {
        let block = self.get_block(block_id).await?;
        require_owner_or_admin(self.ctx, viewer, &block.owner, "delete this block")?;

        if !self.ctx.block_repo().delete(block_id).await? {
            return Err(ServiceError::not_found("Block", block_id));
        }
        info!(block_id = %block_id, by = %viewer, "Block deleted");

        self.delete_media(&block, block.media_refs()).await;

        self.ctx
            .publish(FeedEvent::BlockDeleted(BlockDeletedEvent {
                block_id,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    /// Best effort: a failed image delete never fails the block operation.
    /// Only objects under the block owner's prefix are removed; anything else
    /// the block merely points at belongs to someone else.
    async fn delete_media<'r>(&self, block: &Block, refs: impl Iterator<Item = &'r str>) {
        let prefix = owner_prefix(&block.owner);
        for url in refs.filter(|u| StorageUrl::is_storage_url(u)) {
            let owned = StorageUrl::parse(url)
                .is_ok_and(|parsed| parsed.path().starts_with(&prefix));
            if !owned {
                debug!(block_id = %block.id, url, "Keeping image outside the owner's uploads");
                continue;
            }
            if let Err(e) = self.ctx.blob_store().delete_by_url(url).await {
                warn!(block_id = %block.id, url, error = %e, "Failed to delete stored image");
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
