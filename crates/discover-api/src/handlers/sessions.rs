//! Feed session endpoints
//!
//! A session owns a viewer identity, its profile cache and an infinite-scroll
//! pager. Clients report scroll positions and the server decides whether
//! another page is due.

use std::sync::Arc;

use axum::{extract::State, Json};
use discover_core::{SortMode, TimeFilter};
use discover_service::dto::{
    CardPageResponse, CardResponse, FeedFiltersRequest, LoadPageRequest, PagerResponse,
    PaginationMeta, SessionResponse,
};
use discover_service::services::cards::render_html;
use discover_service::services::{FeedSession, LoadOutcome, ScrollMetrics};
use discover_service::CardService;

use crate::extractors::{AuthUser, IdPath, JsonBody, OptionalAuthUser, OptionalJsonBody, SessionPath};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

fn lookup(state: &AppState, path: &SessionPath) -> ApiResult<Arc<FeedSession>> {
    let id = path.session_id()?;
    state.sessions().get(id).ok_or(ApiError::SessionNotFound)
}

fn pager_response(session: &FeedSession, outcome: Option<LoadOutcome>) -> PagerResponse {
    PagerResponse::from_snapshot(session.id.to_string(), &session.pager.snapshot(), outcome)
}

fn session_response(session: &FeedSession) -> SessionResponse {
    SessionResponse {
        session_id: session.id.to_string(),
        signed_in: session.viewer.is_signed_in(),
    }
}

/// Open a session; the bearer token, if any, becomes its viewer
///
/// POST /sessions
pub async fn open_session(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
) -> Created<Json<SessionResponse>> {
    let session = state.sessions().open(auth.key().cloned());
    Created(Json(session_response(&session)))
}

/// GET /sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
) -> ApiResult<Json<PagerResponse>> {
    let session = lookup(&state, &path)?;
    Ok(Json(pager_response(&session, None)))
}

/// DELETE /sessions/{session_id}
pub async fn close_session(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
) -> ApiResult<NoContent> {
    let id = path.session_id()?;
    if state.sessions().close(id) {
        Ok(NoContent)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

/// Change sort and time window, then reload from the first page
///
/// PUT /sessions/{session_id}/filters
pub async fn set_filters(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
    JsonBody(request): JsonBody<FeedFiltersRequest>,
) -> ApiResult<Json<PagerResponse>> {
    let session = lookup(&state, &path)?;
    let sort = SortMode::parse(&request.sort)?;
    let time = TimeFilter::parse(&request.time)?;

    let outcome = session.pager.set_filters(sort, time).await?;
    Ok(Json(pager_response(&session, Some(outcome))))
}

/// POST /sessions/{session_id}/load
pub async fn load_page(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
    OptionalJsonBody(request): OptionalJsonBody<LoadPageRequest>,
) -> ApiResult<Json<PagerResponse>> {
    let session = lookup(&state, &path)?;
    let reset = request.unwrap_or_default().reset;

    let outcome = session.pager.load(reset).await?;
    Ok(Json(pager_response(&session, Some(outcome))))
}

/// Report a scroll position; loads the next page when near the end
///
/// POST /sessions/{session_id}/scroll
pub async fn report_scroll(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
    JsonBody(metrics): JsonBody<ScrollMetrics>,
) -> ApiResult<Json<PagerResponse>> {
    let session = lookup(&state, &path)?;
    let outcome = session.pager.on_scroll(metrics).await?;
    Ok(Json(pager_response(&session, Some(outcome))))
}

/// Every loaded item rendered for the session's viewer
///
/// GET /sessions/{session_id}/cards
pub async fn get_cards(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
) -> ApiResult<Json<CardPageResponse>> {
    let session = lookup(&state, &path)?;
    let snapshot = session.pager.snapshot();

    let cards = CardService::new(state.service_context())
        .build_cards(&session.viewer, &snapshot.items)
        .await;

    let pager = PagerResponse::from_snapshot(session.id.to_string(), &snapshot, None);
    Ok(Json(CardPageResponse {
        data: cards
            .iter()
            .map(|card| CardResponse {
                block_id: card.block_id,
                html: render_html(card),
            })
            .collect(),
        pagination: PaginationMeta {
            next_cursor: pager.next_cursor,
            has_more: pager.has_more,
            limit: state.service_context().page_size(),
        },
    }))
}

/// Attach the bearer identity to the session
///
/// PUT /sessions/{session_id}/identity
pub async fn sign_in(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<SessionPath>,
) -> ApiResult<Json<SessionResponse>> {
    let session = lookup(&state, &path)?;
    session.viewer.sign_in(auth.key);
    Ok(Json(session_response(&session)))
}

/// Drop the session identity and its cached profiles
///
/// DELETE /sessions/{session_id}/identity
pub async fn sign_out(
    State(state): State<AppState>,
    IdPath(path): IdPath<SessionPath>,
) -> ApiResult<Json<SessionResponse>> {
    let session = lookup(&state, &path)?;
    session.viewer.sign_out();
    Ok(Json(session_response(&session)))
}
