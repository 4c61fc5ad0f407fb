//! Path parameter extractors
//!
//! Snowflake ids arrive as strings and are parsed here so a malformed id is a
//! 400, not a routing miss.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use discover_core::{Snowflake, UserKey};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::response::ApiError;

/// Path extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(IdPath(inner))
    }
}

fn parse_snowflake(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

#[derive(Debug, serde::Deserialize)]
pub struct BlockIdPath {
    pub block_id: String,
}

impl BlockIdPath {
    pub fn block_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.block_id, "block_id")
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct BlockCommentPath {
    pub block_id: String,
    pub comment_id: String,
}

impl BlockCommentPath {
    pub fn block_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.block_id, "block_id")
    }

    pub fn comment_id(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.comment_id, "comment_id")
    }
}

/// Generic `:id` segment for collab posts and notifications
impl IdPath<String> {
    pub fn snowflake(&self) -> Result<Snowflake, ApiError> {
        parse_snowflake(&self.0, "id")
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SessionPath {
    pub session_id: String,
}

impl SessionPath {
    pub fn session_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.session_id)
            .map_err(|_| ApiError::invalid_path("Invalid session_id format"))
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct UserKeyPath {
    pub user_key: String,
}

impl UserKeyPath {
    pub fn user_key(&self) -> Result<UserKey, ApiError> {
        UserKey::parse(&self.user_key)
            .map_err(|_| ApiError::invalid_path("Invalid user_key format"))
    }
}
