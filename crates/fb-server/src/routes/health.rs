//! Liveness probe.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: String,
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(ctx): State<AppContext>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok".to_string(),
        uptime: ctx.started_at.elapsed().as_secs_f64(),
        timestamp: fb_core::time::now(),
    };
    tracing::debug!(uptime = payload.uptime, "health check");

    ([(header::CACHE_CONTROL, "no-store")], Json(payload))
}
