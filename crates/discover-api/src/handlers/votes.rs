//! Vote handlers
//!
//! Signed-out votes and votes on vanished blocks are silent no-ops and
//! answer 204.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use discover_core::{VoteOutcome, VoteValue};
use discover_service::dto::{CastVoteRequest, ToggleVoteRequest, VoteResponse};
use discover_service::VoteService;
use serde_json::json;

use crate::extractors::{BlockIdPath, IdPath, JsonBody, OptionalAuthUser};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

fn outcome_response(outcome: Option<VoteOutcome>) -> Response {
    match outcome {
        Some(outcome) => Json(VoteResponse::from(&outcome)).into_response(),
        None => NoContent.into_response(),
    }
}

/// Set the viewer's vote to -1, 0 or 1
///
/// PUT /blocks/{block_id}/vote
pub async fn cast_vote(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(path): IdPath<BlockIdPath>,
    JsonBody(request): JsonBody<CastVoteRequest>,
) -> ApiResult<Response> {
    let value = VoteValue::try_from(request.value)?;
    let outcome = VoteService::new(state.service_context())
        .cast_vote(auth.key(), path.block_id()?, value)
        .await?;
    Ok(outcome_response(outcome))
}

/// Vote button click: repeating the active direction clears the vote
///
/// POST /blocks/{block_id}/vote/toggle
pub async fn toggle_vote(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(path): IdPath<BlockIdPath>,
    JsonBody(request): JsonBody<ToggleVoteRequest>,
) -> ApiResult<Response> {
    let direction = match VoteValue::try_from(request.direction)? {
        VoteValue::Neutral => {
            return Err(ApiError::invalid_body("direction must be 1 or -1"));
        }
        direction => direction,
    };
    let outcome = VoteService::new(state.service_context())
        .toggle_vote(auth.key(), path.block_id()?, direction)
        .await?;
    Ok(outcome_response(outcome))
}

/// The viewer's current vote; 0 when signed out
///
/// GET /blocks/{block_id}/vote
pub async fn get_vote(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(path): IdPath<BlockIdPath>,
) -> ApiResult<Json<serde_json::Value>> {
    let block_id = path.block_id()?;
    let value = VoteService::new(state.service_context())
        .viewer_vote(auth.key(), block_id)
        .await?;
    Ok(Json(json!({
        "block_id": block_id,
        "value": value.as_i64(),
    })))
}
