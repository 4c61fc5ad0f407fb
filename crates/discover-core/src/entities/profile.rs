//! User profile entity

use chrono::{DateTime, Utc};

use crate::value_objects::UserKey;

/// Avatar shown when a profile has none or could not be loaded
pub const DEFAULT_AVATAR: &str = "/assets/default-avatar.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub key: UserKey,
    pub title: String,
    pub avatar: Option<String>,
    pub numeric_id: i64,
    pub connections: Vec<UserKey>,
    pub dismissed_requests: Vec<UserKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(key: UserKey, numeric_id: i64) -> Self {
        let now = Utc::now();
        Self {
            title: key.local_part().to_string(),
            key,
            avatar: None,
            numeric_id,
            connections: Vec::new(),
            dismissed_requests: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Display title, falling back to the raw identifier
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.key.as_str()
        } else {
            &self.title
        }
    }

    pub fn avatar_url(&self) -> &str {
        self.avatar.as_deref().unwrap_or(DEFAULT_AVATAR)
    }

    /// Returns false when the connection already existed
    pub fn add_connection(&mut self, other: UserKey) -> bool {
        if other == self.key || self.connections.contains(&other) {
            return false;
        }
        self.connections.push(other);
        self.updated_at = Utc::now();
        true
    }

    pub fn dismiss_request(&mut self, from: UserKey) -> bool {
        if self.dismissed_requests.contains(&from) {
            return false;
        }
        self.dismissed_requests.push(from);
        self.updated_at = Utc::now();
        true
    }
}
