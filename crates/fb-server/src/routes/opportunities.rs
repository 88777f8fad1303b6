//! Funding opportunity route handlers: list, create, detail, save/unsave.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fb_core::{Error, OpportunityId, OpportunityKind, UserId};
use fb_db::models::{Opportunity, SavedOpportunity};
use fb_db::queries::opportunities::{self, NewOpportunity, OpportunityFilter};
use fb_db::queries::{saved, users};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{
    filter_value, optional_date, page_limit, parse_filter, require_user_id, required,
};

/// Query parameters for listing opportunities.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListOpportunitiesParams {
    /// `grant`, `vc`, `angel`, `loan`, or `all`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub deadline_before: Option<String>,
    pub q: Option<String>,
    /// `true` restricts results to `userId`'s saved set.
    pub saved: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

/// An opportunity with the caller's bookmark state.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OpportunityResponse {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    /// Present only when the request named a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

/// Create-opportunity payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub currency: Option<String>,
    pub deadline: Option<String>,
    pub eligibility: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub process: Vec<String>,
    pub url: Option<String>,
    pub score: Option<i64>,
}

/// Body for bookmarking an opportunity.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub user_id: Option<String>,
}

/// Query for removing a bookmark.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnsaveParams {
    pub user_id: Option<String>,
}

fn positive_amount(value: Option<i64>, field: &str) -> fb_core::Result<i64> {
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(Error::validation(format!("{field} is required"))),
    }
}

/// GET /api/opportunities
#[utoipa::path(
    get,
    path = "/api/opportunities",
    params(ListOpportunitiesParams),
    responses(
        (status = 200, description = "Matching opportunities, best score first", body = Vec<OpportunityResponse>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_opportunities(
    State(ctx): State<AppContext>,
    Query(params): Query<ListOpportunitiesParams>,
) -> Result<Json<Vec<OpportunityResponse>>, AppError> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| UserId::from(v.to_string()));
    let saved_only = params.saved.as_deref() == Some("true");

    let filter = OpportunityFilter {
        kind: parse_filter::<OpportunityKind>(params.kind.as_deref())?,
        industry: filter_value(params.industry.as_deref()).map(String::from),
        location: filter_value(params.location.as_deref()).map(String::from),
        min_amount: params.min_amount,
        max_amount: params.max_amount,
        deadline_before: optional_date(params.deadline_before.as_deref())?,
        query: params.q.clone().filter(|q| !q.trim().is_empty()),
        saved_by: user_id.clone().filter(|_| saved_only),
        limit: page_limit(params.limit, opportunities::DEFAULT_LIMIT)?,
    };

    let conn = ctx.conn()?;
    let rows = opportunities::list_opportunities(&conn, &filter)?;
    let saved_set = match &user_id {
        Some(uid) => Some(saved::saved_ids(&conn, uid)?),
        None => None,
    };

    let body = rows
        .into_iter()
        .map(|opportunity| OpportunityResponse {
            saved: saved_set.as_ref().map(|s| s.contains(&opportunity.id)),
            opportunity,
        })
        .collect();
    Ok(Json(body))
}

/// POST /api/opportunities
#[utoipa::path(
    post,
    path = "/api/opportunities",
    request_body = CreateOpportunityRequest,
    responses(
        (status = 201, description = "Opportunity created", body = Opportunity),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_opportunity(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateOpportunityRequest>,
) -> Result<(StatusCode, Json<Opportunity>), AppError> {
    let kind: OpportunityKind = required(&payload.kind, "type")?.parse()?;
    let amount_min = positive_amount(payload.amount_min, "amountMin")?;
    let amount_max = positive_amount(payload.amount_max, "amountMax")?;
    if amount_min > amount_max {
        return Err(Error::validation("amountMin must not exceed amountMax").into());
    }

    let new = NewOpportunity {
        title: required(&payload.title, "title")?.to_string(),
        kind,
        industry: required(&payload.industry, "industry")?.to_string(),
        location: required(&payload.location, "location")?.to_string(),
        amount_min,
        amount_max,
        currency: payload
            .currency
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "USD".to_string()),
        deadline: fb_core::time::normalize(required(&payload.deadline, "deadline")?)?,
        eligibility: required(&payload.eligibility, "eligibility")?.to_string(),
        description: required(&payload.description, "description")?.to_string(),
        requirements: payload.requirements,
        process: payload.process,
        url: payload.url,
        score: payload.score.unwrap_or(0).clamp(0, 100),
    };

    let conn = ctx.conn()?;
    let created = opportunities::create_opportunity(&conn, &new)?;
    tracing::info!(opportunity_id = %created.id, title = %created.title, "Opportunity created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/opportunities/{id}
#[utoipa::path(
    get,
    path = "/api/opportunities/{id}",
    params(("id" = String, Path, description = "Opportunity ID")),
    responses(
        (status = 200, description = "Opportunity details", body = Opportunity),
        (status = 404, description = "Opportunity not found")
    )
)]
pub async fn get_opportunity(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Opportunity>, AppError> {
    let id = OpportunityId::from(id);
    let conn = ctx.conn()?;
    let opportunity = opportunities::get_opportunity(&conn, &id)?
        .ok_or_else(|| Error::not_found("opportunity", &id))?;
    Ok(Json(opportunity))
}

/// POST /api/opportunities/{id}/save
#[utoipa::path(
    post,
    path = "/api/opportunities/{id}/save",
    params(("id" = String, Path, description = "Opportunity ID")),
    request_body = SaveRequest,
    responses(
        (status = 201, description = "Opportunity saved (idempotent)", body = SavedOpportunity),
        (status = 400, description = "userId missing"),
        (status = 404, description = "Opportunity or user not found")
    )
)]
pub async fn save_opportunity(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<SaveRequest>,
) -> Result<(StatusCode, Json<SavedOpportunity>), AppError> {
    let user_id = require_user_id(payload.user_id.as_deref())?;
    let id = OpportunityId::from(id);

    let conn = ctx.conn()?;
    if opportunities::get_opportunity(&conn, &id)?.is_none() {
        return Err(Error::not_found("opportunity", &id).into());
    }
    if users::get_user_by_id(&conn, &user_id)?.is_none() {
        return Err(Error::not_found("user", &user_id).into());
    }

    let saved = saved::save_opportunity(&conn, &user_id, &id)?;
    tracing::debug!(opportunity_id = %id, user_id = %user_id, "Opportunity saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/opportunities/{id}/save
#[utoipa::path(
    delete,
    path = "/api/opportunities/{id}/save",
    params(("id" = String, Path, description = "Opportunity ID"), UnsaveParams),
    responses(
        (status = 204, description = "Bookmark removed"),
        (status = 400, description = "userId missing"),
        (status = 404, description = "Opportunity was not saved")
    )
)]
pub async fn unsave_opportunity(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Query(params): Query<UnsaveParams>,
) -> Result<StatusCode, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let id = OpportunityId::from(id);

    let conn = ctx.conn()?;
    if saved::unsave_opportunity(&conn, &user_id, &id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("saved opportunity", &id).into())
    }
}
