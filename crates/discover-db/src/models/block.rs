//! Block database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `global_blocks`
#[derive(Debug, Clone, FromRow)]
pub struct BlockModel {
    pub id: i64,
    pub owner_key: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub block_type: String,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub slides: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

/// Column list shared by every block query
pub(crate) const BLOCK_COLUMNS: &str = "id, owner_key, title, description, link, block_type, icon, image, slides, created_at, upvotes, downvotes, score";
