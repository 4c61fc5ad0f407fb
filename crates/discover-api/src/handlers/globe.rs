//! Globe intro endpoints
//!
//! The client draws the scene and runs the camera timeline; these endpoints
//! hand it the geometry and the timing for a variant.

use axum::{
    extract::{Query, State},
    Json,
};
use discover_globe::{GlobeScene, IntroConfig, IntroVariant, SceneOptions};
use serde::Deserialize;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

const MAX_STARS: usize = 10_000;

#[derive(Debug, Default, Deserialize)]
pub struct SceneParams {
    pub seed: Option<u64>,
    pub stars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IntroParams {
    pub variant: Option<String>,
}

/// GET /globe/scene?seed=&stars=
pub async fn get_scene(
    State(state): State<AppState>,
    Query(params): Query<SceneParams>,
) -> ApiResult<Json<GlobeScene>> {
    let defaults = SceneOptions::default();
    let star_count = params.stars.unwrap_or(defaults.star_count);
    if star_count > MAX_STARS {
        return Err(ApiError::invalid_query(format!(
            "stars must be at most {MAX_STARS}"
        )));
    }

    let options = SceneOptions {
        seed: params.seed.unwrap_or(defaults.seed),
        star_count,
        ..defaults
    };

    let scene = GlobeScene::build(&options);
    let scene = match state.globe_outline() {
        Some(outline) => scene.with_outline(outline.clone()),
        None => scene,
    };
    Ok(Json(scene))
}

/// GET /globe/intro?variant=
pub async fn get_intro(
    State(state): State<AppState>,
    Query(params): Query<IntroParams>,
) -> ApiResult<Json<IntroConfig>> {
    let variant = match params.variant.as_deref() {
        Some(raw) => raw.parse::<IntroVariant>()?,
        None => IntroVariant::default(),
    };
    Ok(Json(IntroConfig::from_globe_config(
        &state.config().globe,
        variant,
    )))
}
