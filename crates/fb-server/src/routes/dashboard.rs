//! Dashboard analytics for one user.

use axum::extract::{Query, State};
use axum::Json;
use fb_core::metrics::{
    self, Activity, ApplicationSummary, DateRange, FunnelStage, Kpi, OutreachSummary,
    PipelinePoint,
};
use fb_core::UserId;
use fb_db::queries::{applications, outreach, saved};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::require_user_id;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    pub user_id: Option<String>,
    /// `7d`, `30d` (default), or `90d`.
    pub date_range: Option<String>,
}

/// Headline numbers behind the dashboard widgets.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_applications: u32,
    pub approved_applications: u32,
    pub in_progress_applications: u32,
    pub total_requested: i64,
    pub approved_amount: i64,
    pub success_rate: u32,
    pub total_outreach: u32,
    pub positive_responses: u32,
    pub pending_outreach: u32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub kpis: Vec<Kpi>,
    pub readiness_score: u32,
    pub readiness_suggestions: Vec<String>,
    pub activities: Vec<Activity>,
    pub pipeline_data: Vec<PipelinePoint>,
    pub success_metrics: Vec<FunnelStage>,
    pub summary: DashboardSummary,
    pub date_range: DateRange,
}

/// Everything the dashboard and analytics snapshots derive from.
pub(crate) struct UserMetrics {
    pub apps: ApplicationSummary,
    pub outreach: OutreachSummary,
    pub saved: u32,
    pub readiness: u32,
}

pub(crate) fn collect_metrics(conn: &Connection, user_id: &UserId) -> fb_core::Result<UserMetrics> {
    let apps = ApplicationSummary::from_rows(applications::status_amounts(conn, user_id)?);
    let outreach = OutreachSummary::from_statuses(outreach::statuses(conn, user_id)?);
    let saved = saved::count_saved(conn, user_id)?;
    let readiness = metrics::readiness_score(&apps, &outreach, saved);
    Ok(UserMetrics {
        apps,
        outreach,
        saved,
        readiness,
    })
}

/// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard metrics", body = DashboardResponse),
        (status = 400, description = "userId missing")
    )
)]
pub async fn get_dashboard(
    State(ctx): State<AppContext>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let date_range = DateRange::parse_or_default(params.date_range.as_deref());

    let (m, under_review) = {
        let conn = ctx.conn()?;
        (
            collect_metrics(&conn, &user_id)?,
            applications::latest_under_review(&conn, &user_id)?,
        )
    };
    tracing::debug!(
        user_id = %user_id,
        date_range = date_range.as_str(),
        readiness = m.readiness,
        "dashboard computed"
    );

    let pipeline_data = metrics::pipeline_series(&mut rand::thread_rng());

    Ok(Json(DashboardResponse {
        kpis: metrics::kpis(&m.apps, m.saved),
        readiness_score: m.readiness,
        readiness_suggestions: metrics::readiness_suggestions(),
        activities: metrics::activities(under_review.as_deref()),
        pipeline_data,
        success_metrics: metrics::success_funnel(&m.apps),
        summary: DashboardSummary {
            total_applications: m.apps.total_applications,
            approved_applications: m.apps.approved_applications,
            in_progress_applications: m.apps.in_progress_applications,
            total_requested: m.apps.total_requested,
            approved_amount: m.apps.approved_amount,
            success_rate: m.apps.success_rate,
            total_outreach: m.outreach.total,
            positive_responses: m.outreach.positive,
            pending_outreach: m.outreach.pending,
        },
        date_range,
    }))
}
