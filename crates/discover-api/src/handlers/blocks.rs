//! Block handlers

use axum::{extract::State, Json};
use discover_service::dto::{BlockResponse, CreateBlockRequest, UpdateBlockRequest};
use discover_service::services::cards::render_html;
use discover_service::services::FeedItem;
use discover_service::{BlockService, CardService, ViewerSession};

use crate::extractors::{AuthUser, BlockIdPath, IdPath, JsonBody, OptionalAuthUser};
use crate::response::{ApiResult, Created, HtmlFragment, NoContent};
use crate::state::AppState;

/// POST /blocks
pub async fn create_block(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    JsonBody(request): JsonBody<CreateBlockRequest>,
) -> ApiResult<Created<Json<BlockResponse>>> {
    let block = BlockService::new(state.service_context())
        .create_block(auth.key(), request)
        .await?;
    Ok(Created(Json(BlockResponse::from(&block))))
}

/// GET /blocks/{block_id}
pub async fn get_block(
    State(state): State<AppState>,
    IdPath(path): IdPath<BlockIdPath>,
) -> ApiResult<Json<BlockResponse>> {
    let block = BlockService::new(state.service_context())
        .get_block(path.block_id()?)
        .await?;
    Ok(Json(BlockResponse::from(&block)))
}

/// PATCH /blocks/{block_id}
pub async fn update_block(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<BlockIdPath>,
    JsonBody(request): JsonBody<UpdateBlockRequest>,
) -> ApiResult<Json<BlockResponse>> {
    let block = BlockService::new(state.service_context())
        .update_block(&auth.key, path.block_id()?, request)
        .await?;
    Ok(Json(BlockResponse::from(&block)))
}

/// DELETE /blocks/{block_id}
pub async fn delete_block(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<BlockIdPath>,
) -> ApiResult<NoContent> {
    BlockService::new(state.service_context())
        .delete_block(&auth.key, path.block_id()?)
        .await?;
    Ok(NoContent)
}

/// One block rendered as an HTML card
///
/// GET /blocks/{block_id}/card
pub async fn get_block_card(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(path): IdPath<BlockIdPath>,
) -> ApiResult<HtmlFragment> {
    let ctx = state.service_context();
    let block = BlockService::new(ctx).get_block(path.block_id()?).await?;

    let session = auth
        .key()
        .cloned()
        .map_or_else(ViewerSession::anonymous, ViewerSession::signed_in);
    let card = CardService::new(ctx)
        .build_card(&session, &FeedItem::plain(block))
        .await;
    Ok(HtmlFragment(render_html(&card)))
}
