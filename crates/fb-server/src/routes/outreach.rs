//! Investor outreach log: list, create, update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fb_core::{Error, InvestorId, OutreachId, OutreachKind, OutreachStatus};
use fb_db::models::Outreach;
use fb_db::queries::outreach::{self, NewOutreach, OutreachUpdate};
use fb_db::queries::{investors, users};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{filter_value, optional_date, parse_filter, require_user_id, required};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListOutreachParams {
    pub user_id: Option<String>,
    pub investor_id: Option<String>,
    /// `pending`, `positive`, `neutral`, `negative`, or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutreachRequest {
    pub user_id: Option<String>,
    pub investor_id: Option<String>,
    /// `message`, `meeting`, or `pitch`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutreachRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
}

/// GET /api/outreach
#[utoipa::path(
    get,
    path = "/api/outreach",
    params(ListOutreachParams),
    responses(
        (status = 200, description = "The user's outreach, newest first", body = Vec<Outreach>),
        (status = 400, description = "userId missing or invalid filter")
    )
)]
pub async fn list_outreach(
    State(ctx): State<AppContext>,
    Query(params): Query<ListOutreachParams>,
) -> Result<Json<Vec<Outreach>>, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let investor_id = filter_value(params.investor_id.as_deref()).map(|v| InvestorId::from(v.to_string()));
    let status = parse_filter::<OutreachStatus>(params.status.as_deref())?;

    let conn = ctx.conn()?;
    let rows = outreach::list_outreach(&conn, &user_id, investor_id.as_ref(), status)?;
    Ok(Json(rows))
}

/// POST /api/outreach
#[utoipa::path(
    post,
    path = "/api/outreach",
    request_body = CreateOutreachRequest,
    responses(
        (status = 201, description = "Outreach logged", body = Outreach),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "User or investor not found")
    )
)]
pub async fn create_outreach(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateOutreachRequest>,
) -> Result<(StatusCode, Json<Outreach>), AppError> {
    let user_id = require_user_id(payload.user_id.as_deref())?;
    let investor_id = InvestorId::from(required(&payload.investor_id, "investorId")?.to_string());
    let kind: OutreachKind = required(&payload.kind, "type")?.parse()?;
    let status = match filter_value(payload.status.as_deref()) {
        Some(s) => s.parse()?,
        None => OutreachStatus::default(),
    };
    let scheduled_date = optional_date(payload.scheduled_date.as_deref())?;

    let conn = ctx.conn()?;
    if users::get_user_by_id(&conn, &user_id)?.is_none() {
        return Err(Error::not_found("user", &user_id).into());
    }
    if investors::get_investor(&conn, &investor_id)?.is_none() {
        return Err(Error::not_found("investor", &investor_id).into());
    }

    let created = outreach::create_outreach(
        &conn,
        &NewOutreach {
            user_id,
            investor_id,
            kind,
            status,
            subject: payload.subject,
            message: payload.message,
            notes: payload.notes,
            scheduled_date,
        },
    )?;
    tracing::info!(outreach_id = %created.id, investor_id = %created.investor_id, "Outreach logged");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/outreach/{id}
#[utoipa::path(
    put,
    path = "/api/outreach/{id}",
    params(("id" = String, Path, description = "Outreach ID")),
    request_body = UpdateOutreachRequest,
    responses(
        (status = 200, description = "Outreach updated", body = Outreach),
        (status = 404, description = "Outreach not found")
    )
)]
pub async fn update_outreach(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOutreachRequest>,
) -> Result<Json<Outreach>, AppError> {
    let id = OutreachId::from(id);
    let update = OutreachUpdate {
        status: parse_filter::<OutreachStatus>(payload.status.as_deref())?,
        notes: payload.notes,
        scheduled_date: optional_date(payload.scheduled_date.as_deref())?,
    };

    let conn = ctx.conn()?;
    let updated = outreach::update_outreach(&conn, &id, &update)?
        .ok_or_else(|| Error::not_found("outreach", &id))?;
    Ok(Json(updated))
}
