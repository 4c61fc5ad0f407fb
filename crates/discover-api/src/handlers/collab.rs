//! Collab post handlers

use axum::{
    extract::{Query, State},
    Json,
};
use discover_service::dto::{
    CollabPostResponse, CreateCollabPostRequest, ListParams, UpdateCollabPostRequest,
};
use discover_service::CollabPostService;

use crate::extractors::{AuthUser, IdPath, JsonBody, OptionalAuthUser};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /collab-posts?limit=
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CollabPostResponse>>> {
    let posts = CollabPostService::new(state.service_context())
        .list_posts(params.limit)
        .await?;
    Ok(Json(posts.iter().map(CollabPostResponse::from).collect()))
}

/// POST /collab-posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    JsonBody(request): JsonBody<CreateCollabPostRequest>,
) -> ApiResult<Created<Json<CollabPostResponse>>> {
    let post = CollabPostService::new(state.service_context())
        .create_post(auth.key(), request)
        .await?;
    Ok(Created(Json(CollabPostResponse::from(&post))))
}

/// GET /collab-posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    path: IdPath<String>,
) -> ApiResult<Json<CollabPostResponse>> {
    let post = CollabPostService::new(state.service_context())
        .get_post(path.snowflake()?)
        .await?;
    Ok(Json(CollabPostResponse::from(&post)))
}

/// PATCH /collab-posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    path: IdPath<String>,
    JsonBody(request): JsonBody<UpdateCollabPostRequest>,
) -> ApiResult<Json<CollabPostResponse>> {
    let post = CollabPostService::new(state.service_context())
        .update_post(&auth.key, path.snowflake()?, request)
        .await?;
    Ok(Json(CollabPostResponse::from(&post)))
}

/// DELETE /collab-posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    path: IdPath<String>,
) -> ApiResult<NoContent> {
    CollabPostService::new(state.service_context())
        .delete_post(&auth.key, path.snowflake()?)
        .await?;
    Ok(NoContent)
}
