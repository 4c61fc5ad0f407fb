//! Vote entity - a voter's single vote row for one block

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserKey, VoteTally, VoteValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub block_id: Snowflake,
    pub voter: UserKey,
    pub value: VoteValue,
    pub updated_at: DateTime<Utc>,
}

/// Result of one committed vote transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub block_id: Snowflake,
    pub previous: VoteValue,
    pub current: VoteValue,
    pub tally: VoteTally,
}

impl VoteOutcome {
    #[inline]
    pub fn score(&self) -> i64 {
        self.tally.score()
    }
}
