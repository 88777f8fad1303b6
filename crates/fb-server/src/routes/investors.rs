//! Investor directory route handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use fb_core::{Error, InvestorKind, UserId};
use fb_db::models::Investor;
use fb_db::queries::investors::{self, InvestorFilter, NewInvestor};
use fb_db::queries::outreach;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{filter_value, page_limit, parse_filter, required};

/// Query parameters for listing investors.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListInvestorsParams {
    /// Substring of the investor's name or email.
    pub q: Option<String>,
    /// `vc`, `angel`, or `strategic`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub stage: Option<String>,
    pub geo: Option<String>,
    pub industry: Option<String>,
    /// Adds per-investor outreach counters for this user.
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

/// Outreach counters for one investor and the requesting user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutreachCounters {
    /// Most recent outreach, epoch milliseconds.
    pub last_outreach: Option<i64>,
    pub outreach_count: u32,
    pub pending_outreach: u32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InvestorResponse {
    #[serde(flatten)]
    pub investor: Investor,
    #[serde(flatten)]
    pub outreach: Option<OutreachCounters>,
}

/// Create-investor payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestorRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub geo: Vec<String>,
    pub funding_min: Option<i64>,
    pub funding_max: Option<i64>,
    #[serde(default)]
    pub portfolio: Vec<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub match_score: Option<i64>,
}

/// GET /api/investors
#[utoipa::path(
    get,
    path = "/api/investors",
    params(ListInvestorsParams),
    responses(
        (status = 200, description = "Matching investors, best match first", body = Vec<InvestorResponse>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_investors(
    State(ctx): State<AppContext>,
    Query(params): Query<ListInvestorsParams>,
) -> Result<Json<Vec<InvestorResponse>>, AppError> {
    let filter = InvestorFilter {
        kind: parse_filter::<InvestorKind>(params.kind.as_deref())?,
        query: filter_value(params.q.as_deref()).map(String::from),
        stage: filter_value(params.stage.as_deref()).map(String::from),
        geo: filter_value(params.geo.as_deref()).map(String::from),
        industry: filter_value(params.industry.as_deref()).map(String::from),
        limit: usize::try_from(page_limit(params.limit, investors::DEFAULT_LIMIT as i64)?)
            .unwrap_or(usize::MAX),
    };

    let conn = ctx.conn()?;
    let rows = investors::list_investors(&conn, &filter)?;

    let stats = match params.user_id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(uid) => Some(outreach::stats_by_investor(&conn, &UserId::from(uid.to_string()))?),
        None => None,
    };

    let body = rows
        .into_iter()
        .map(|investor| {
            let outreach = stats.as_ref().map(|by_investor| {
                let s = by_investor.get(&investor.id).copied().unwrap_or_default();
                OutreachCounters {
                    last_outreach: s.last_outreach,
                    outreach_count: s.outreach_count,
                    pending_outreach: s.pending_outreach,
                }
            });
            InvestorResponse { investor, outreach }
        })
        .collect();
    Ok(Json(body))
}

/// POST /api/investors
#[utoipa::path(
    post,
    path = "/api/investors",
    request_body = CreateInvestorRequest,
    responses(
        (status = 201, description = "Investor created", body = Investor),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_investor(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateInvestorRequest>,
) -> Result<(StatusCode, Json<Investor>), AppError> {
    let name = required(&payload.name, "name")?.to_string();
    let kind: InvestorKind = required(&payload.kind, "type")?.parse()?;
    let (funding_min, funding_max) = match (payload.funding_min, payload.funding_max) {
        (Some(min), Some(max)) if min > 0 && max > 0 => (min, max),
        _ => return Err(Error::validation("fundingMin and fundingMax are required").into()),
    };
    if funding_min > funding_max {
        return Err(Error::validation("fundingMin must not exceed fundingMax").into());
    }

    let new = NewInvestor {
        name,
        kind,
        stages: payload.stages,
        industries: payload.industries,
        geo: payload.geo,
        funding_min,
        funding_max,
        portfolio: payload.portfolio,
        email: payload.email,
        linkedin: payload.linkedin,
        website: payload.website,
        match_score: payload.match_score.unwrap_or(0).clamp(0, 100),
    };

    let conn = ctx.conn()?;
    let created = investors::create_investor(&conn, &new)?;
    tracing::info!(investor_id = %created.id, name = %created.name, "Investor created");
    Ok((StatusCode::CREATED, Json(created)))
}
