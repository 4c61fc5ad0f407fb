//! Notification handlers

use axum::{
    extract::{Query, State},
    Json,
};
use discover_service::dto::{
    BroadcastRequest, BroadcastResponse, ListParams, NotificationResponse,
    SentNotificationResponse,
};
use discover_service::NotificationService;

use crate::extractors::{AuthUser, IdPath, JsonBody};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// The viewer's inbox, newest first
///
/// GET /notifications?limit=
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = NotificationService::new(state.service_context())
        .list_for_user(&auth.key, params.limit)
        .await?;
    Ok(Json(notifications.iter().map(NotificationResponse::from).collect()))
}

/// POST /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    path: IdPath<String>,
) -> ApiResult<NoContent> {
    NotificationService::new(state.service_context())
        .mark_read(&auth.key, path.snowflake()?)
        .await?;
    Ok(NoContent)
}

/// Admin fan-out to explicit recipients or every profile
///
/// POST /admin/notifications
pub async fn broadcast(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<BroadcastRequest>,
) -> ApiResult<Created<Json<BroadcastResponse>>> {
    let outcome = NotificationService::new(state.service_context())
        .broadcast(&auth.key, request)
        .await?;
    Ok(Created(Json(BroadcastResponse::from(&outcome))))
}

/// GET /admin/notifications/sent?limit=
pub async fn list_sent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SentNotificationResponse>>> {
    let sent = NotificationService::new(state.service_context())
        .list_sent(&auth.key, params.limit)
        .await?;
    Ok(Json(sent.iter().map(SentNotificationResponse::from).collect()))
}
