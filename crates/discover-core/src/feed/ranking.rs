//! Relevance ranking for the `relevant` sort mode
//!
//! `relevance = score + comment_count + max(0, 72 - hours_since_creation) * 0.5`
//!
//! Ranking only ever reorders the page that was just fetched
//! ([`RankScope::Page`]); it is recomputed on every load and never stored.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entities::Block;

/// Hours after which a block earns no recency bonus
pub const RECENCY_WINDOW_HOURS: f64 = 72.0;

/// Weight of each remaining hour inside the recency window
pub const RECENCY_WEIGHT: f64 = 0.5;

/// Which blocks a ranking pass reorders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankScope {
    /// Only the blocks of the current page
    Page,
}

pub fn recency_bonus(hours_since_creation: f64) -> f64 {
    (RECENCY_WINDOW_HOURS - hours_since_creation).max(0.0) * RECENCY_WEIGHT
}

pub fn relevance(score: i64, comment_count: u64, hours_since_creation: f64) -> f64 {
    score as f64 + comment_count as f64 + recency_bonus(hours_since_creation)
}

/// A block with the inputs and result of its relevance computation
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBlock {
    pub block: Block,
    pub comment_count: u64,
    pub relevance: f64,
}

/// Sort one page by relevance, highest first; equal values keep fetch order
pub fn rank_page(page: Vec<(Block, u64)>, now: DateTime<Utc>) -> Vec<RankedBlock> {
    let mut ranked: Vec<RankedBlock> = page
        .into_iter()
        .map(|(block, comment_count)| {
            let relevance = relevance(
                block.score,
                comment_count,
                block.hours_since_creation(now),
            );
            RankedBlock {
                block,
                comment_count,
                relevance,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
