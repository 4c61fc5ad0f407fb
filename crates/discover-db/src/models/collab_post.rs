//! Collab post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CollabPostModel {
    pub id: i64,
    pub owner_key: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}
