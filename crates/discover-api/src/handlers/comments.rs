//! Comment thread handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use discover_service::dto::{CommentListParams, CommentPageResponse, CommentRequest, CommentResponse};
use discover_service::CommentService;

use crate::extractors::{AuthUser, BlockCommentPath, BlockIdPath, IdPath, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Newest comments; `all=true` expands to the full listing
///
/// GET /blocks/{block_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(path): IdPath<BlockIdPath>,
    Query(params): Query<CommentListParams>,
) -> ApiResult<Json<CommentPageResponse>> {
    let service = CommentService::new(state.service_context());
    let block_id = path.block_id()?;
    let page = if params.all {
        service.view_all(block_id).await?
    } else {
        service.first_page(block_id).await?
    };
    Ok(Json(CommentPageResponse::from(&page)))
}

/// Blank text or a signed-out viewer is a no-op answered with 204
///
/// POST /blocks/{block_id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(path): IdPath<BlockIdPath>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> ApiResult<Response> {
    let comment = CommentService::new(state.service_context())
        .add_comment(auth.key(), path.block_id()?, &request.text)
        .await?;
    Ok(match comment {
        Some(comment) => Created(Json(CommentResponse::from(&comment))).into_response(),
        None => NoContent.into_response(),
    })
}

/// PATCH /blocks/{block_id}/comments/{comment_id}
pub async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<BlockCommentPath>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let comment = CommentService::new(state.service_context())
        .edit_comment(&auth.key, path.block_id()?, path.comment_id()?, &request.text)
        .await?;
    Ok(Json(CommentResponse::from(&comment)))
}

/// DELETE /blocks/{block_id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<BlockCommentPath>,
) -> ApiResult<NoContent> {
    CommentService::new(state.service_context())
        .delete_comment(&auth.key, path.block_id()?, path.comment_id()?)
        .await?;
    Ok(NoContent)
}
