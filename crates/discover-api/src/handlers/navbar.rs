//! Navbar handlers

use axum::{extract::State, Json};
use discover_service::services::navbar::render_html;
use discover_service::services::NavbarSlots;
use discover_service::{NavbarService, ViewerSession};

use crate::extractors::OptionalAuthUser;
use crate::response::HtmlFragment;
use crate::state::AppState;

async fn slots(state: &AppState, auth: &OptionalAuthUser) -> NavbarSlots {
    let session = auth
        .key()
        .cloned()
        .map_or_else(ViewerSession::anonymous, ViewerSession::signed_in);
    NavbarService::new(state.service_context())
        .navbar(&session)
        .await
}

/// GET /navbar
pub async fn get_navbar(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
) -> Json<NavbarSlots> {
    Json(slots(&state, &auth).await)
}

/// GET /navbar/html
pub async fn get_navbar_html(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
) -> HtmlFragment {
    HtmlFragment(render_html(&slots(&state, &auth).await))
}
