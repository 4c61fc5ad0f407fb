//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; `discover-db` provides the
//! PostgreSQL and in-memory implementations.

use async_trait::async_trait;

use crate::entities::{
    Block, CollabPost, Comment, Notification, SentNotification, UserProfile, VoteOutcome,
};
use crate::error::DomainError;
use crate::feed::FeedQuery;
use crate::value_objects::{Snowflake, UserKey, VoteValue};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Block Repository
// ============================================================================

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Block>>;

    /// One page of blocks in the query's order, after its cursor
    async fn query_feed(&self, query: &FeedQuery) -> RepoResult<Vec<Block>>;

    async fn create(&self, block: &Block) -> RepoResult<()>;

    /// Update content fields; vote counters are only written by [`VoteRepository::cast`]
    async fn update(&self, block: &Block) -> RepoResult<()>;

    /// Delete a block with its votes and comments. Returns false if it was already gone.
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The voter's current vote, `None` when no row exists
    async fn find(&self, block_id: Snowflake, voter: &UserKey) -> RepoResult<Option<VoteValue>>;

    /// Atomically replace the voter's vote and adjust the block counters.
    ///
    /// Both reads and both writes happen in one transaction. Returns `None`
    /// without writing anything when the block does not exist.
    async fn cast(
        &self,
        block_id: Snowflake,
        voter: &UserKey,
        value: VoteValue,
    ) -> RepoResult<Option<VoteOutcome>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(
        &self,
        block_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Comment>>;

    /// Newest first
    async fn list_recent(&self, block_id: Snowflake, limit: usize) -> RepoResult<Vec<Comment>>;

    async fn count(&self, block_id: Snowflake) -> RepoResult<u64>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    async fn delete(&self, block_id: Snowflake, comment_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_key(&self, key: &UserKey) -> RepoResult<Option<UserProfile>>;

    /// Create a profile with the next numeric id; returns the existing one if present
    async fn create_for(&self, key: &UserKey) -> RepoResult<UserProfile>;

    async fn update(&self, profile: &UserProfile) -> RepoResult<()>;

    /// Every registered key, used as the broadcast recipient list
    async fn list_keys(&self) -> RepoResult<Vec<UserKey>>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert one batch of at most
    /// [`NOTIFICATION_BATCH_LIMIT`](crate::entities::NOTIFICATION_BATCH_LIMIT) entries
    async fn insert_batch(&self, batch: &[Notification]) -> RepoResult<()>;

    async fn record_sent(&self, entry: &SentNotification) -> RepoResult<()>;

    async fn list_sent(&self, limit: usize) -> RepoResult<Vec<SentNotification>>;

    /// Newest first
    async fn list_for_user(&self, recipient: &UserKey, limit: usize)
        -> RepoResult<Vec<Notification>>;

    async fn mark_read(&self, recipient: &UserKey, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Collab Post Repository
// ============================================================================

#[async_trait]
pub trait CollabPostRepository: Send + Sync {
    /// Newest first
    async fn list(&self, limit: usize) -> RepoResult<Vec<CollabPost>>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<CollabPost>>;

    async fn create(&self, post: &CollabPost) -> RepoResult<()>;

    async fn update(&self, post: &CollabPost) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;
}
