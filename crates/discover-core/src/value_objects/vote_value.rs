//! Vote values and the up/down tally arithmetic applied by the vote transaction

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A voter's standing on one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    Down,
    #[default]
    Neutral,
    Up,
}

impl VoteValue {
    #[inline]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Down => -1,
            Self::Neutral => 0,
            Self::Up => 1,
        }
    }

    /// Clicking the active direction again clears the vote
    pub fn toggled(self, direction: VoteValue) -> VoteValue {
        if self == direction {
            Self::Neutral
        } else {
            direction
        }
    }

    #[inline]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Down),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Up),
            other => Err(DomainError::InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.as_i64()
    }
}

/// Aggregate counters stored on a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub const fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }

    #[inline]
    pub const fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    /// Remove the effect of `previous` and add the effect of `next`
    pub fn apply(self, previous: VoteValue, next: VoteValue) -> Self {
        let mut tally = self;
        match previous {
            VoteValue::Up => tally.upvotes -= 1,
            VoteValue::Down => tally.downvotes -= 1,
            VoteValue::Neutral => {}
        }
        match next {
            VoteValue::Up => tally.upvotes += 1,
            VoteValue::Down => tally.downvotes += 1,
            VoteValue::Neutral => {}
        }
        tally
    }
}
