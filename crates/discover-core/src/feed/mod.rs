//! Feed model - query construction, keyset cursors and relevance ranking

mod query;
mod ranking;

pub use query::{FeedCursor, FeedOrder, FeedQuery, SortMode, TimeFilter, FEED_PAGE_SIZE};
pub use ranking::{
    rank_page, recency_bonus, relevance, RankScope, RankedBlock, RECENCY_WEIGHT,
    RECENCY_WINDOW_HOURS,
};
