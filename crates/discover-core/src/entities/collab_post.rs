//! Collab post entity - a call for collaborators

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollabPost {
    pub id: Snowflake,
    pub owner: UserKey,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CollabPost {
    pub fn new(id: Snowflake, owner: UserKey, title: String, description: String) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            link: None,
            created_at: Utc::now(),
        }
    }
}
