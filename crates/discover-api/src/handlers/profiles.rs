//! Profile handlers

use axum::{extract::State, Json};
use discover_core::UserKey;
use discover_service::dto::{ProfileResponse, UpdateProfileRequest, UserKeyRequest};
use discover_service::ProfileService;

use crate::extractors::{AuthUser, IdPath, UserKeyPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// The viewer's profile, created on first access
///
/// GET /profiles/@me
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::new(state.service_context())
        .ensure_profile(&auth.key)
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// PATCH /profiles/@me
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    service.ensure_profile(&auth.key).await?;
    let profile = service.update_profile(&auth.key, request).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// GET /profiles/{user_key}
pub async fn get_profile(
    State(state): State<AppState>,
    IdPath(path): IdPath<UserKeyPath>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::new(state.service_context())
        .get_profile(&path.user_key()?)
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// POST /profiles/@me/connections
pub async fn add_connection(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UserKeyRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let other = UserKey::parse(&request.user_key)?;
    let service = ProfileService::new(state.service_context());
    service.ensure_profile(&auth.key).await?;
    let profile = service.add_connection(&auth.key, &other).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// POST /profiles/@me/dismissed
pub async fn dismiss_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UserKeyRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let from = UserKey::parse(&request.user_key)?;
    let service = ProfileService::new(state.service_context());
    service.ensure_profile(&auth.key).await?;
    let profile = service.dismiss_request(&auth.key, &from).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}
