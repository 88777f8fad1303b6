//! Signed-in landing document served at `/`.

use axum::Extension;
use axum::Json;
use fb_db::models::User;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LandingResponse {
    pub name: String,
    pub version: String,
    pub user: User,
    /// Entry points for the signed-in user.
    pub links: Vec<String>,
}

/// GET /
///
/// Only reachable through the session gate, which supplies the user.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing document", body = LandingResponse),
        (status = 307, description = "No session; redirect to /login")
    )
)]
pub async fn landing(Extension(user): Extension<User>) -> Json<LandingResponse> {
    let links = [
        "/api/dashboard",
        "/api/opportunities",
        "/api/investors",
        "/api/applications",
        "/api/events",
    ]
    .into_iter()
    .map(|path| format!("{path}?userId={}", user.id))
    .collect();

    Json(LandingResponse {
        name: "fundboard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        user,
        links,
    })
}
