//! Demo data seeding.

use axum::extract::State;
use axum::Json;
use fb_db::seed::{self, SeedCounts};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SeedInfo {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    /// Rows inserted per table; zero on re-seed.
    pub data: SeedCounts,
}

/// GET /api/seed
#[utoipa::path(
    get,
    path = "/api/seed",
    responses(
        (status = 200, description = "Seed endpoint info", body = SeedInfo)
    )
)]
pub async fn seed_info() -> Json<SeedInfo> {
    Json(SeedInfo {
        status: "ok".to_string(),
        message: "Demo data seeding endpoint".to_string(),
    })
}

/// POST /api/seed
#[utoipa::path(
    post,
    path = "/api/seed",
    responses(
        (status = 200, description = "Demo data seeded", body = SeedResponse),
        (status = 500, description = "Seeding failed")
    )
)]
pub async fn seed_demo(State(ctx): State<AppContext>) -> Result<Json<SeedResponse>, AppError> {
    let conn = ctx.conn()?;
    let counts = seed::seed_demo_data(&conn)?;
    Ok(Json(SeedResponse {
        success: true,
        message: "Demo data seeded successfully".to_string(),
        data: counts,
    }))
}
