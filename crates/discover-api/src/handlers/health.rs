//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use discover_service::dto::{HealthChecks, HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let database = match ctx.pool() {
        Some(pool) => match pool.acquire().await {
            Ok(_) => "healthy",
            Err(e) => {
                tracing::warn!(error = %e, "Database readiness check failed");
                "unhealthy"
            }
        },
        None => "memory",
    };

    let redis = match ctx.redis_pool() {
        Some(pool) => match pool.health_check().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!(error = %e, "Redis readiness check failed");
                "unhealthy"
            }
        },
        None => "disabled",
    };

    let response = ReadinessResponse::from_checks(HealthChecks { database, redis });
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
