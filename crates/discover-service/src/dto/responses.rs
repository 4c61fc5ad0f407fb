//! Response DTOs for API endpoints
//!
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use discover_core::Snowflake;
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Cursor pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Pass back as `cursor` to fetch the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub limit: usize,
}

// ============================================================================
// Feed Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BlockResponse {
    pub id: Snowflake,
    pub owner: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub block_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItemResponse {
    #[serde(flatten)]
    pub block: BlockResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedPageResponse {
    pub data: Vec<FeedItemResponse>,
    pub pagination: PaginationMeta,
    pub sort: &'static str,
    pub time: &'static str,
    /// `page` when the items were re-ranked within this page only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_scope: Option<&'static str>,
}

/// One rendered card
#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub block_id: Snowflake,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardPageResponse {
    pub data: Vec<CardResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub signed_in: bool,
}

/// State of a feed session after an action
#[derive(Debug, Clone, Serialize)]
pub struct PagerResponse {
    pub session_id: String,
    /// What the last action did: loaded, skipped, discarded, not_needed, exhausted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    pub sort: &'static str,
    pub time: &'static str,
    pub items: Vec<FeedItemResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub loading: bool,
}

// ============================================================================
// Vote Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub block_id: Snowflake,
    pub previous: i64,
    pub value: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Snowflake,
    pub block_id: Snowflake,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentPageResponse {
    pub data: Vec<CommentResponse>,
    pub show_all: bool,
    pub can_view_all: bool,
}

// ============================================================================
// Profile Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_key: String,
    pub title: String,
    pub avatar: String,
    pub numeric_id: i64,
    pub profile_href: String,
    pub connections: Vec<String>,
    pub dismissed_requests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Admin Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CollabPostResponse {
    pub id: Snowflake,
    pub owner: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: Snowflake,
    pub sender: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentNotificationResponse {
    pub id: Snowflake,
    pub sender: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub recipient_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastResponse {
    pub sent: SentNotificationResponse,
    pub batches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Per-dependency status: healthy, unhealthy, memory or disabled
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: &'static str,
    pub redis: &'static str,
}

impl ReadinessResponse {
    pub fn from_checks(checks: HealthChecks) -> Self {
        let ready = checks.database != "unhealthy" && checks.redis != "unhealthy";
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_treats_memory_as_ready() {
        let ready = ReadinessResponse::from_checks(HealthChecks {
            database: "memory",
            redis: "disabled",
        });
        assert!(ready.is_ready());

        let down = ReadinessResponse::from_checks(HealthChecks {
            database: "healthy",
            redis: "unhealthy",
        });
        assert!(!down.is_ready());
    }

    #[test]
    fn test_pagination_skips_missing_cursor() {
        let json = serde_json::to_value(PaginationMeta {
            next_cursor: None,
            has_more: false,
            limit: 10,
        })
        .unwrap();
        assert!(json.get("next_cursor").is_none());
    }
}
