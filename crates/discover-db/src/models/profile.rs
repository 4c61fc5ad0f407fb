//! User profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `users`
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub user_key: String,
    pub numeric_id: i64,
    pub title: String,
    pub avatar: Option<String>,
    pub connections: Vec<String>,
    pub dismissed_requests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
