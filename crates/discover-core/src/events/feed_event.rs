//! Feed events - published best effort so open feeds can refresh counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, UserKey, VoteTally, VoteValue};

/// Pub/sub channel every feed event goes to
pub const FEED_CHANNEL: &str = "discover:feed";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEvent {
    BlockVoted(BlockVotedEvent),
    CommentAdded(CommentAddedEvent),
    CommentDeleted(CommentDeletedEvent),
    BlockDeleted(BlockDeletedEvent),
}

impl FeedEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BlockVoted(_) => "BLOCK_VOTED",
            Self::CommentAdded(_) => "COMMENT_ADDED",
            Self::CommentDeleted(_) => "COMMENT_DELETED",
            Self::BlockDeleted(_) => "BLOCK_DELETED",
        }
    }

    pub fn block_id(&self) -> Snowflake {
        match self {
            Self::BlockVoted(e) => e.block_id,
            Self::CommentAdded(e) => e.block_id,
            Self::CommentDeleted(e) => e.block_id,
            Self::BlockDeleted(e) => e.block_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::BlockVoted(e) => e.timestamp,
            Self::CommentAdded(e) => e.timestamp,
            Self::CommentDeleted(e) => e.timestamp,
            Self::BlockDeleted(e) => e.timestamp,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockVotedEvent {
    pub block_id: Snowflake,
    pub voter: UserKey,
    pub value: VoteValue,
    pub tally: VoteTally,
    pub score: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAddedEvent {
    pub block_id: Snowflake,
    pub comment_id: Snowflake,
    pub author: UserKey,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeletedEvent {
    pub block_id: Snowflake,
    pub comment_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDeletedEvent {
    pub block_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}
