//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers::{
    blocks, collab, comments, feed, globe, health, navbar, notifications, profiles, sessions,
    uploads, votes,
};
use crate::state::AppState;

/// Slack on top of the configured file size for request framing
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

/// Create the main API router (health routes are mounted separately)
pub fn create_router(max_upload_bytes: u64) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(max_upload_bytes))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes(max_upload_bytes: u64) -> Router<AppState> {
    Router::new()
        .merge(feed_routes())
        .merge(session_routes())
        .merge(block_routes())
        .merge(profile_routes())
        .merge(admin_routes())
        .merge(upload_routes(max_upload_bytes))
        .merge(globe_routes())
}

fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/feed/cards", get(feed::get_feed_cards))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(sessions::open_session))
        .route(
            "/sessions/:session_id",
            get(sessions::get_session).delete(sessions::close_session),
        )
        .route("/sessions/:session_id/filters", put(sessions::set_filters))
        .route("/sessions/:session_id/load", post(sessions::load_page))
        .route("/sessions/:session_id/scroll", post(sessions::report_scroll))
        .route("/sessions/:session_id/cards", get(sessions::get_cards))
        .route(
            "/sessions/:session_id/identity",
            put(sessions::sign_in).delete(sessions::sign_out),
        )
}

fn block_routes() -> Router<AppState> {
    Router::new()
        .route("/blocks", post(blocks::create_block))
        .route(
            "/blocks/:block_id",
            get(blocks::get_block)
                .patch(blocks::update_block)
                .delete(blocks::delete_block),
        )
        .route("/blocks/:block_id/card", get(blocks::get_block_card))
        // Votes
        .route(
            "/blocks/:block_id/vote",
            get(votes::get_vote).put(votes::cast_vote),
        )
        .route("/blocks/:block_id/vote/toggle", post(votes::toggle_vote))
        // Comments
        .route(
            "/blocks/:block_id/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/blocks/:block_id/comments/:comment_id",
            patch(comments::edit_comment).delete(comments::delete_comment),
        )
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profiles/@me",
            get(profiles::get_my_profile).patch(profiles::update_my_profile),
        )
        .route("/profiles/@me/connections", post(profiles::add_connection))
        .route("/profiles/@me/dismissed", post(profiles::dismiss_request))
        .route("/profiles/:user_key", get(profiles::get_profile))
        .route("/navbar", get(navbar::get_navbar))
        .route("/navbar/html", get(navbar::get_navbar_html))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", post(notifications::mark_read))
}

/// Collab board and admin broadcast
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collab-posts",
            get(collab::list_posts).post(collab::create_post),
        )
        .route(
            "/collab-posts/:id",
            get(collab::get_post)
                .patch(collab::update_post)
                .delete(collab::delete_post),
        )
        .route("/admin/notifications", post(notifications::broadcast))
        .route("/admin/notifications/sent", get(notifications::list_sent))
}

fn upload_routes(max_upload_bytes: u64) -> Router<AppState> {
    let limit = usize::try_from(max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(UPLOAD_BODY_OVERHEAD);
    Router::new()
        .route(
            "/uploads",
            post(uploads::upload_image).delete(uploads::delete_image),
        )
        .layer(DefaultBodyLimit::max(limit))
}

fn globe_routes() -> Router<AppState> {
    Router::new()
        .route("/globe/scene", get(globe::get_scene))
        .route("/globe/intro", get(globe::get_intro))
}
