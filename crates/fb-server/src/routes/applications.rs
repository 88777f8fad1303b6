//! Funding application tracker: CRUD plus documents and compliance items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fb_core::{
    ApplicationId, ApplicationStatus, ComplianceItemId, DocumentKind, Error, OpportunityId,
};
use fb_db::models::{ApplicationDetail, ApplicationDocument, ComplianceItem};
use fb_db::queries::applications::{self, ApplicationUpdate, NewApplication};
use fb_db::queries::{opportunities, users};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{
    filter_value, optional_date, page_limit, parse_filter, require_user_id, required,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListApplicationsParams {
    pub user_id: Option<String>,
    /// Application status, or `all`.
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// Checklist entry supplied when creating an application.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ComplianceInput {
    pub label: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub user_id: Option<String>,
    pub opportunity_id: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
    pub amount_requested: Option<i64>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub next_action: Option<String>,
    pub insights: Option<String>,
    #[serde(default)]
    pub compliance_items: Vec<ComplianceInput>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub id: Option<String>,
    pub status: Option<String>,
    pub next_action: Option<String>,
    pub insights: Option<String>,
    pub submission_date: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddDocumentRequest {
    pub name: Option<String>,
    /// `pdf`, `docx`, `xls`, or `other`; guessed from the name when absent.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ComplianceUpdateRequest {
    pub done: bool,
}

/// GET /api/applications
#[utoipa::path(
    get,
    path = "/api/applications",
    params(ListApplicationsParams),
    responses(
        (status = 200, description = "The user's applications with nested rows", body = Vec<ApplicationDetail>),
        (status = 400, description = "userId missing or invalid status")
    )
)]
pub async fn list_applications(
    State(ctx): State<AppContext>,
    Query(params): Query<ListApplicationsParams>,
) -> Result<Json<Vec<ApplicationDetail>>, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let status = parse_filter::<ApplicationStatus>(params.status.as_deref())?;
    let limit = page_limit(params.limit, applications::DEFAULT_LIMIT)?;

    let conn = ctx.conn()?;
    let rows = applications::list_application_details(&conn, &user_id, status, limit)?;
    Ok(Json(rows))
}

/// POST /api/applications
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application created", body = ApplicationDetail),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "User or opportunity not found")
    )
)]
pub async fn create_application(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationDetail>), AppError> {
    let user_id = require_user_id(payload.user_id.as_deref())?;
    let name = required(&payload.name, "name")?.to_string();
    let source = required(&payload.source, "source")?.to_string();
    let amount_requested = match payload.amount_requested {
        Some(v) if v > 0 => v,
        _ => return Err(Error::validation("amountRequested is required").into()),
    };
    let status = match filter_value(payload.status.as_deref()) {
        Some(s) => s.parse()?,
        None => ApplicationStatus::default(),
    };

    let new = NewApplication {
        user_id,
        opportunity_id: filter_value(payload.opportunity_id.as_deref())
            .map(|v| OpportunityId::from(v.to_string())),
        name,
        source,
        amount_requested,
        status,
        deadline: optional_date(payload.deadline.as_deref())?,
        next_action: payload.next_action,
        insights: payload.insights,
        compliance: payload
            .compliance_items
            .into_iter()
            .filter(|c| !c.label.trim().is_empty())
            .map(|c| (c.label, c.done))
            .collect(),
    };

    let conn = ctx.conn()?;
    if users::get_user_by_id(&conn, &new.user_id)?.is_none() {
        return Err(Error::not_found("user", &new.user_id).into());
    }
    if let Some(opportunity_id) = &new.opportunity_id {
        if opportunities::get_opportunity(&conn, opportunity_id)?.is_none() {
            return Err(Error::not_found("opportunity", opportunity_id).into());
        }
    }
    let created = applications::create_application(&conn, &new)?;
    let detail = applications::get_application_detail(&conn, &created.id)?
        .ok_or_else(|| Error::not_found("application", &created.id))?;
    tracing::info!(application_id = %created.id, user_id = %created.user_id, "Application created");
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/applications
#[utoipa::path(
    put,
    path = "/api/applications",
    request_body = UpdateApplicationRequest,
    responses(
        (status = 200, description = "Application updated", body = ApplicationDetail),
        (status = 400, description = "Missing id or invalid status"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn update_application(
    State(ctx): State<AppContext>,
    Json(payload): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let id = match filter_value(payload.id.as_deref()) {
        Some(v) => ApplicationId::from(v.to_string()),
        None => return Err(Error::validation("Application ID is required").into()),
    };
    let update = ApplicationUpdate {
        status: parse_filter::<ApplicationStatus>(payload.status.as_deref())?,
        next_action: payload.next_action,
        insights: payload.insights,
        submission_date: optional_date(payload.submission_date.as_deref())?,
    };

    let conn = ctx.conn()?;
    if applications::update_application(&conn, &id, &update)?.is_none() {
        return Err(Error::not_found("application", &id).into());
    }
    let detail = applications::get_application_detail(&conn, &id)?
        .ok_or_else(|| Error::not_found("application", &id))?;
    if let Some(status) = update.status {
        tracing::info!(application_id = %id, %status, "Application status changed");
    }
    Ok(Json(detail))
}

/// GET /api/applications/{id}
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application with nested rows", body = ApplicationDetail),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_application(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let id = ApplicationId::from(id);
    let conn = ctx.conn()?;
    let detail = applications::get_application_detail(&conn, &id)?
        .ok_or_else(|| Error::not_found("application", &id))?;
    Ok(Json(detail))
}

/// DELETE /api/applications/{id}
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn delete_application(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = ApplicationId::from(id);
    let conn = ctx.conn()?;
    if applications::delete_application(&conn, &id)? {
        tracing::info!(application_id = %id, "Application deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("application", &id).into())
    }
}

/// POST /api/applications/{id}/documents
#[utoipa::path(
    post,
    path = "/api/applications/{id}/documents",
    params(("id" = String, Path, description = "Application ID")),
    request_body = AddDocumentRequest,
    responses(
        (status = 201, description = "Document attached", body = ApplicationDocument),
        (status = 400, description = "Missing name or invalid type"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn add_document(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<ApplicationDocument>), AppError> {
    let id = ApplicationId::from(id);
    let name = required(&payload.name, "name")?;
    let kind = parse_filter::<DocumentKind>(payload.kind.as_deref())?
        .unwrap_or_else(|| DocumentKind::from_file_name(name));

    let conn = ctx.conn()?;
    if applications::get_application(&conn, &id)?.is_none() {
        return Err(Error::not_found("application", &id).into());
    }
    let doc = applications::add_document(&conn, &id, name, kind, payload.url.as_deref())?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// PUT /api/applications/{id}/compliance/{item_id}
#[utoipa::path(
    put,
    path = "/api/applications/{id}/compliance/{item_id}",
    params(
        ("id" = String, Path, description = "Application ID"),
        ("item_id" = String, Path, description = "Compliance item ID")
    ),
    request_body = ComplianceUpdateRequest,
    responses(
        (status = 200, description = "Compliance item updated", body = ComplianceItem),
        (status = 404, description = "Compliance item not found")
    )
)]
pub async fn set_compliance(
    State(ctx): State<AppContext>,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<ComplianceUpdateRequest>,
) -> Result<Json<ComplianceItem>, AppError> {
    let id = ApplicationId::from(id);
    let item_id = ComplianceItemId::from(item_id);

    let conn = ctx.conn()?;
    let item = applications::set_compliance_done(&conn, &id, &item_id, payload.done)?
        .ok_or_else(|| Error::not_found("compliance item", &item_id))?;
    Ok(Json(item))
}
