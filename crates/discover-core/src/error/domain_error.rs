//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Block not found: {0}")]
    BlockNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Collab post not found: {0}")]
    CollabPostNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid user key: {0}")]
    InvalidUserKey(String),

    #[error("Invalid vote value: {0}")]
    InvalidVoteValue(i64),

    #[error("Not a storage URL: {0}")]
    InvalidStorageUrl(String),

    #[error("File too large: max {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    #[error("Batch too large: max {max} writes")]
    BatchTooLarge { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the author of this comment")]
    NotCommentAuthor,

    #[error("Not the owner of this item")]
    NotOwner,

    #[error("Admin only")]
    AdminOnly,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlockNotFound(_) => "UNKNOWN_BLOCK",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::CollabPostNotFound(_) => "UNKNOWN_COLLAB_POST",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUserKey(_) => "INVALID_USER_KEY",
            Self::InvalidVoteValue(_) => "INVALID_VOTE_VALUE",
            Self::InvalidStorageUrl(_) => "INVALID_STORAGE_URL",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",

            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotOwner => "NOT_OWNER",
            Self::AdminOnly => "ADMIN_ONLY",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ProfileNotFound(_)
                | Self::CollabPostNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidUserKey(_)
                | Self::InvalidVoteValue(_)
                | Self::InvalidStorageUrl(_)
                | Self::FileTooLarge { .. }
                | Self::BatchTooLarge { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotCommentAuthor | Self::NotOwner | Self::AdminOnly)
    }
}
