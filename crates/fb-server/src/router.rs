//! Axum router construction.
//!
//! Builds the full application router with all route groups, middleware
//! layers, and the OpenAPI document.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::auth::require_session;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::root::landing,
        routes::health::health_check,
        routes::auth::register,
        routes::auth::login,
        routes::auth::logout,
        routes::auth::current_session,
        routes::opportunities::list_opportunities,
        routes::opportunities::create_opportunity,
        routes::opportunities::get_opportunity,
        routes::opportunities::save_opportunity,
        routes::opportunities::unsave_opportunity,
        routes::investors::list_investors,
        routes::investors::create_investor,
        routes::outreach::list_outreach,
        routes::outreach::create_outreach,
        routes::outreach::update_outreach,
        routes::applications::list_applications,
        routes::applications::create_application,
        routes::applications::update_application,
        routes::applications::get_application,
        routes::applications::delete_application,
        routes::applications::add_document,
        routes::applications::set_compliance,
        routes::profile::get_profile,
        routes::profile::upsert_profile,
        routes::profile::patch_profile,
        routes::dashboard::get_dashboard,
        routes::events::list_events,
        routes::chat::chat,
        routes::finance::analyze,
        routes::seed::seed_info,
        routes::seed::seed_demo,
        routes::analytics::analytics_status,
        routes::analytics::record_beacon,
        routes::analytics::list_snapshots,
        routes::analytics::create_snapshot,
    ),
    components(schemas(
        routes::root::LandingResponse,
        routes::health::HealthResponse,
        routes::auth::RegisterRequest,
        routes::auth::LoginRequest,
        routes::auth::AuthResponse,
        routes::auth::SessionResponse,
        routes::opportunities::OpportunityResponse,
        routes::opportunities::CreateOpportunityRequest,
        routes::opportunities::SaveRequest,
        routes::investors::InvestorResponse,
        routes::investors::OutreachCounters,
        routes::investors::CreateInvestorRequest,
        routes::outreach::CreateOutreachRequest,
        routes::outreach::UpdateOutreachRequest,
        routes::applications::CreateApplicationRequest,
        routes::applications::ComplianceInput,
        routes::applications::UpdateApplicationRequest,
        routes::applications::AddDocumentRequest,
        routes::applications::ComplianceUpdateRequest,
        routes::profile::UpsertProfileRequest,
        routes::profile::PatchProfileRequest,
        routes::dashboard::DashboardResponse,
        routes::dashboard::DashboardSummary,
        routes::chat::ChatRequest,
        routes::chat::ChatResponse,
        routes::chat::AttachmentEcho,
        routes::seed::SeedInfo,
        routes::seed::SeedResponse,
        routes::analytics::BeaconAck,
        routes::analytics::SnapshotRequest,
        fb_core::finance::FinanceInput,
        fb_core::finance::FinanceAnalysis,
        fb_db::seed::SeedCounts,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::current_session))
        // Opportunities
        .route(
            "/opportunities",
            get(routes::opportunities::list_opportunities)
                .post(routes::opportunities::create_opportunity),
        )
        .route("/opportunities/{id}", get(routes::opportunities::get_opportunity))
        .route(
            "/opportunities/{id}/save",
            post(routes::opportunities::save_opportunity)
                .delete(routes::opportunities::unsave_opportunity),
        )
        // Investors and outreach
        .route(
            "/investors",
            get(routes::investors::list_investors).post(routes::investors::create_investor),
        )
        .route(
            "/outreach",
            get(routes::outreach::list_outreach).post(routes::outreach::create_outreach),
        )
        .route("/outreach/{id}", put(routes::outreach::update_outreach))
        // Applications
        .route(
            "/applications",
            get(routes::applications::list_applications)
                .post(routes::applications::create_application)
                .put(routes::applications::update_application),
        )
        .route(
            "/applications/{id}",
            get(routes::applications::get_application)
                .delete(routes::applications::delete_application),
        )
        .route(
            "/applications/{id}/documents",
            post(routes::applications::add_document),
        )
        .route(
            "/applications/{id}/compliance/{item_id}",
            put(routes::applications::set_compliance),
        )
        // Profile
        .route(
            "/profile",
            get(routes::profile::get_profile)
                .post(routes::profile::upsert_profile)
                .put(routes::profile::patch_profile),
        )
        // Dashboard, events, assistant, calculators
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/events", get(routes::events::list_events))
        .route("/chat", post(routes::chat::chat))
        .route("/finance/analysis", post(routes::finance::analyze))
        // Seed and analytics
        .route(
            "/seed",
            get(routes::seed::seed_info).post(routes::seed::seed_demo),
        )
        .route(
            "/analytics",
            get(routes::analytics::analytics_status).post(routes::analytics::record_beacon),
        )
        .route(
            "/analytics/snapshots",
            get(routes::analytics::list_snapshots).post(routes::analytics::create_snapshot),
        );

    // Every /api request counts against the caller's per-path quota.
    let api = api.layer(middleware::from_fn_with_state(ctx.clone(), rate_limit_middleware));

    let root = Router::new()
        .route("/", get(routes::root::landing))
        .layer(middleware::from_fn_with_state(ctx.clone(), require_session));

    Router::new()
        .merge(root)
        .nest("/api", api)
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fb_core::config::Config;
    use tower::ServiceExt;

    fn test_router(dir: &tempfile::TempDir) -> Router {
        let db = fb_db::pool::init_pool(&dir.path().join("router.db"), 2).unwrap();
        let mut config = Config::default();
        config.rate_limit.requests_per_minute = 2;
        build_router(AppContext::new(db, config))
    }

    #[tokio::test]
    async fn root_redirects_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(&dir)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[tokio::test]
    async fn api_quota_is_keyed_without_peer_address() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(&dir);
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    }

    #[test]
    fn openapi_lists_every_api_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/health",
            "/api/opportunities/{id}/save",
            "/api/applications/{id}/compliance/{item_id}",
            "/api/analytics/snapshots",
            "/api/finance/analysis",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
