//! Feed query model
//!
//! [`FeedQuery::build`] turns a sort mode and time filter into an ordering,
//! an optional creation-time lower bound and a page size. Repositories
//! translate it into SQL or evaluate it in memory through
//! [`FeedQuery::admits`] and [`FeedQuery::compare`].

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::entities::Block;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::ranking::RankScope;

/// Blocks per feed page
pub const FEED_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    #[default]
    Recent,
    Votes,
    Relevant,
}

impl SortMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Votes => "votes",
            Self::Relevant => "relevant",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "recent" => Ok(Self::Recent),
            "votes" => Ok(Self::Votes),
            "relevant" => Ok(Self::Relevant),
            other => Err(DomainError::ValidationError(format!(
                "unknown sort mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
    Year,
}

impl TimeFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(DomainError::ValidationError(format!(
                "unknown time filter: {other}"
            ))),
        }
    }

    /// Look-back window, `None` for `all`
    pub fn interval(self) -> Option<Duration> {
        match self {
            Self::All => None,
            Self::Today => Some(Duration::days(1)),
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::Year => Some(Duration::days(365)),
        }
    }
}

/// Ordering clause; ties always fall back to `id DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrder {
    ScoreDesc,
    CreatedAtDesc,
}

/// Position of the last block of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub score: i64,
}

impl FeedCursor {
    pub fn from_block(block: &Block) -> Self {
        Self {
            id: block.id,
            created_at: block.created_at,
            score: block.score,
        }
    }

    /// Opaque token handed to HTTP clients
    pub fn encode(&self) -> String {
        // Nanosecond precision; consecutive blocks can share a millisecond
        format!(
            "{}_{}.{:09}_{}",
            self.score,
            self.created_at.timestamp(),
            self.created_at.timestamp_subsec_nanos(),
            self.id
        )
    }

    pub fn decode(token: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::ValidationError("invalid feed cursor".to_string());

        let mut parts = token.splitn(3, '_');
        let score = parts
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let (secs, nanos) = parts
            .next()
            .and_then(|s| s.split_once('.'))
            .and_then(|(secs, nanos)| Some((secs.parse::<i64>().ok()?, nanos.parse::<u32>().ok()?)))
            .ok_or_else(invalid)?;
        let id = parts
            .next()
            .and_then(|s| Snowflake::parse(s).ok())
            .ok_or_else(invalid)?;
        let created_at = Utc
            .timestamp_opt(secs, nanos)
            .single()
            .ok_or_else(invalid)?;

        Ok(Self {
            id,
            created_at,
            score,
        })
    }
}

impl fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A built feed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub sort: SortMode,
    pub time: TimeFilter,
    pub created_after: Option<DateTime<Utc>>,
    pub order: FeedOrder,
    pub limit: usize,
    pub start_after: Option<FeedCursor>,
}

impl FeedQuery {
    pub fn build(sort: SortMode, time: TimeFilter, now: DateTime<Utc>) -> Self {
        let order = match sort {
            SortMode::Votes => FeedOrder::ScoreDesc,
            // relevant shares the recent base query and is re-ranked afterwards
            SortMode::Recent | SortMode::Relevant => FeedOrder::CreatedAtDesc,
        };

        Self {
            sort,
            time,
            created_after: time.interval().map(|window| now - window),
            order,
            limit: FEED_PAGE_SIZE,
            start_after: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_cursor(mut self, cursor: Option<FeedCursor>) -> Self {
        self.start_after = cursor;
        self
    }

    /// Re-ranking applied after the fetch, if any
    pub fn rank_scope(&self) -> Option<RankScope> {
        (self.sort == SortMode::Relevant).then_some(RankScope::Page)
    }

    /// Whether a block passes the time bound and lies after the cursor
    pub fn admits(&self, block: &Block) -> bool {
        if let Some(bound) = self.created_after {
            if block.created_at < bound {
                return false;
            }
        }
        match &self.start_after {
            Some(cursor) => self.compare_to_cursor(block, cursor) == Ordering::Greater,
            None => true,
        }
    }

    /// Feed ordering: `Less` sorts first
    pub fn compare(&self, a: &Block, b: &Block) -> Ordering {
        let primary = match self.order {
            FeedOrder::ScoreDesc => b.score.cmp(&a.score),
            FeedOrder::CreatedAtDesc => b.created_at.cmp(&a.created_at),
        };
        primary.then_with(|| b.id.cmp(&a.id))
    }

    fn compare_to_cursor(&self, block: &Block, cursor: &FeedCursor) -> Ordering {
        let primary = match self.order {
            FeedOrder::ScoreDesc => cursor.score.cmp(&block.score),
            FeedOrder::CreatedAtDesc => cursor.created_at.cmp(&block.created_at),
        };
        primary.then_with(|| cursor.id.cmp(&block.id))
    }
}
