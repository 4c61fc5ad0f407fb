//! Notification entities - per-user inbox entries and the global send log

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserKey};

/// Maximum writes per fan-out batch
pub const NOTIFICATION_BATCH_LIMIT: usize = 499;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub recipient: UserKey,
    pub sender: UserKey,
    pub message: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub id: Snowflake,
    pub sender: UserKey,
    pub message: String,
    pub link: Option<String>,
    pub recipient_count: i64,
    pub created_at: DateTime<Utc>,
}
