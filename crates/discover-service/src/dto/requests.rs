//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where they carry free text,
//! `Validate`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Feed Requests
// ============================================================================

/// Query string of `GET /feed`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub sort: Option<String>,
    pub time: Option<String>,
    /// Opaque cursor from the previous page
    pub cursor: Option<String>,
}

/// Sort/filter change for a feed session
#[derive(Debug, Clone, Deserialize)]
pub struct FeedFiltersRequest {
    pub sort: String,
    #[serde(default = "default_time")]
    pub time: String,
}

fn default_time() -> String {
    "all".to_string()
}

/// Explicit page load for a feed session
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LoadPageRequest {
    #[serde(default)]
    pub reset: bool,
}

// ============================================================================
// Block Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlockRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: String,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    /// `default`, `large-image` or `carousel`
    #[serde(rename = "type", default)]
    pub block_type: String,

    pub icon: Option<String>,
    pub image: Option<String>,

    #[validate(length(max = 12, message = "At most 12 slides"))]
    #[serde(default)]
    pub slides: Vec<String>,
}

/// Content update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlockRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Empty string removes the link
    pub link: Option<String>,

    #[serde(rename = "type")]
    pub block_type: Option<String>,

    pub icon: Option<String>,
    pub image: Option<String>,

    #[validate(length(max = 12, message = "At most 12 slides"))]
    pub slides: Option<Vec<String>>,
}

// ============================================================================
// Vote Requests
// ============================================================================

/// Set a vote to an explicit value (-1, 0, 1)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CastVoteRequest {
    pub value: i64,
}

/// Vote button click
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ToggleVoteRequest {
    /// 1 for up, -1 for down
    pub direction: i64,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommentListParams {
    #[serde(default)]
    pub all: bool,
}

// ============================================================================
// Profile Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Title must be 1-64 characters"))]
    pub title: Option<String>,

    /// Avatar URL; empty string clears it
    #[validate(length(max = 2048))]
    pub avatar: Option<String>,
}

/// Target of a connection or a dismissed request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserKeyRequest {
    #[validate(email(message = "Invalid user identifier"))]
    pub user_key: String,
}

// ============================================================================
// Collab Post Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCollabPostRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    #[serde(default)]
    pub description: String,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCollabPostRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    /// Empty string removes the link
    pub link: Option<String>,
}

// ============================================================================
// Notification Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BroadcastRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be 1-500 characters"))]
    pub message: String,

    pub link: Option<String>,

    /// Explicit recipients; every profile when absent
    pub recipients: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_block_validation() {
        let ok: CreateBlockRequest = serde_json::from_value(serde_json::json!({
            "title": "Hello",
            "link": "https://example.com",
            "type": "carousel",
            "slides": ["/a.png"]
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.block_type, "carousel");

        let bad: CreateBlockRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "link": "not a url"
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("link"));
    }

    #[test]
    fn test_filters_default_time() {
        let req: FeedFiltersRequest =
            serde_json::from_value(serde_json::json!({"sort": "votes"})).unwrap();
        assert_eq!(req.time, "all");
    }

    #[test]
    fn test_user_key_request_validation() {
        let req = UserKeyRequest {
            user_key: "nope".into(),
        };
        assert!(req.validate().is_err());
    }
}
