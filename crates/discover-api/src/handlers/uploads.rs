//! Image upload handlers
//!
//! The request body is the raw image; the file name comes from `?name=` and
//! the type from the Content-Type header.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use discover_service::dto::UploadResponse;
use discover_service::StorageService;
use serde::Deserialize;

use crate::extractors::{AuthUser, OptionalAuthUser};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUploadParams {
    pub url: String,
}

/// POST /uploads?name=
pub async fn upload_image(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Created<Json<UploadResponse>>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let uploaded = StorageService::new(state.service_context())
        .upload_image(auth.key(), &params.name, body.to_vec(), content_type)
        .await?;

    Ok(Created(Json(UploadResponse {
        url: uploaded.url,
        path: uploaded.path,
    })))
}

/// DELETE /uploads?url=
pub async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DeleteUploadParams>,
) -> ApiResult<NoContent> {
    StorageService::new(state.service_context())
        .delete_image(&auth.key, &params.url)
        .await?;
    Ok(NoContent)
}
