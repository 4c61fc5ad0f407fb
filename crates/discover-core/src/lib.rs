//! # discover-core
//!
//! Domain layer for the discover feed: entities, value objects, the feed
//! query and ranking model, repository traits and feed events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod feed;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    normalize_comment_text, Block, BlockKind, CollabPost, Comment, Notification,
    SentNotification, UserProfile, Vote, VoteOutcome, DEFAULT_AVATAR, NOTIFICATION_BATCH_LIMIT,
};
pub use error::DomainError;
pub use events::{FeedEvent, FEED_CHANNEL};
pub use feed::{
    rank_page, relevance, FeedCursor, FeedOrder, FeedQuery, RankScope, RankedBlock, SortMode,
    TimeFilter, FEED_PAGE_SIZE,
};
pub use traits::{
    BlobStore, BlockRepository, CollabPostRepository, CommentRepository, EventPublisher,
    NoopPublisher, NotificationRepository, ProfileRepository, RepoResult, VoteRepository,
};
pub use value_objects::{
    Snowflake, SnowflakeGenerator, SnowflakeParseError, StorageUrl, UserKey, VoteTally, VoteValue,
};
