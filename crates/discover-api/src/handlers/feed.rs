//! Stateless feed endpoints
//!
//! Each request names its sort, time window and cursor; nothing is kept
//! between calls. Feed sessions in [`super::sessions`] keep that state on
//! the server instead.

use axum::{
    extract::{Query, State},
    Json,
};
use discover_core::{FeedCursor, SortMode, TimeFilter};
use discover_service::dto::{
    rank_scope_name, CardPageResponse, CardResponse, FeedItemResponse, FeedPageResponse,
    FeedParams, PaginationMeta,
};
use discover_service::services::cards::render_html;
use discover_service::services::FeedPage;
use discover_service::{CardService, FeedService, ViewerSession};

use crate::extractors::OptionalAuthUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

struct ParsedParams {
    sort: SortMode,
    time: TimeFilter,
    cursor: Option<FeedCursor>,
}

fn parse_params(params: &FeedParams) -> ApiResult<ParsedParams> {
    let sort = params
        .sort
        .as_deref()
        .map(SortMode::parse)
        .transpose()
        .map_err(|e| ApiError::invalid_query(e.to_string()))?
        .unwrap_or_default();
    let time = params
        .time
        .as_deref()
        .map(TimeFilter::parse)
        .transpose()
        .map_err(|e| ApiError::invalid_query(e.to_string()))?
        .unwrap_or_default();
    let cursor = params
        .cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(FeedCursor::decode)
        .transpose()
        .map_err(|e| ApiError::invalid_query(e.to_string()))?;
    Ok(ParsedParams { sort, time, cursor })
}

async fn fetch(state: &AppState, params: &FeedParams) -> ApiResult<(ParsedParams, FeedPage)> {
    let parsed = parse_params(params)?;
    let page = FeedService::new(state.service_context())
        .fetch_page(parsed.sort, parsed.time, parsed.cursor)
        .await?;
    Ok((parsed, page))
}

/// One page of blocks
///
/// GET /feed?sort=&time=&cursor=
pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<FeedPageResponse>> {
    let (parsed, page) = fetch(&state, &params).await?;
    let limit = state.service_context().page_size();

    Ok(Json(FeedPageResponse {
        data: page.items.iter().map(FeedItemResponse::from).collect(),
        pagination: PaginationMeta::from_page(&page, limit),
        sort: parsed.sort.as_str(),
        time: parsed.time.as_str(),
        rank_scope: rank_scope_name(page.rank_scope),
    }))
}

/// One page rendered as HTML cards for the viewer
///
/// GET /feed/cards?sort=&time=&cursor=
pub async fn get_feed_cards(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<CardPageResponse>> {
    let (_, page) = fetch(&state, &params).await?;
    let limit = state.service_context().page_size();

    let session = auth
        .key()
        .cloned()
        .map_or_else(ViewerSession::anonymous, ViewerSession::signed_in);
    let cards = CardService::new(state.service_context())
        .build_cards(&session, &page.items)
        .await;

    Ok(Json(CardPageResponse {
        data: cards
            .iter()
            .map(|card| CardResponse {
                block_id: card.block_id,
                html: render_html(card),
            })
            .collect(),
        pagination: PaginationMeta::from_page(&page, limit),
    }))
}
