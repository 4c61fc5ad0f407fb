//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    BroadcastRequest, CastVoteRequest, CommentListParams, CommentRequest,
    CreateBlockRequest, CreateCollabPostRequest, FeedFiltersRequest, FeedParams, ListParams,
    LoadPageRequest, ToggleVoteRequest, UpdateBlockRequest, UpdateCollabPostRequest,
    UpdateProfileRequest, UserKeyRequest,
};

pub use responses::{
    ApiResponse, BlockResponse, BroadcastResponse, CardPageResponse, CardResponse, CollabPostResponse,
    CommentPageResponse, CommentResponse, FeedItemResponse, FeedPageResponse, HealthChecks,
    HealthResponse, NotificationResponse, PagerResponse, PaginationMeta, ProfileResponse,
    ReadinessResponse, SentNotificationResponse, SessionResponse, UploadResponse, VoteResponse,
};

pub use mappers::{load_outcome_name, rank_scope_name};
