//! Notification database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `user_notifications`
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub recipient_key: String,
    pub sender_key: String,
    pub message: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Row of `sent_notifications`
#[derive(Debug, Clone, FromRow)]
pub struct SentNotificationModel {
    pub id: i64,
    pub sender_key: String,
    pub message: String,
    pub link: Option<String>,
    pub recipient_count: i64,
    pub created_at: DateTime<Utc>,
}
