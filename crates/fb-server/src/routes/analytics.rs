//! Client beacons and stored analytics snapshots.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use fb_core::Error;
use fb_db::models::AnalyticsSnapshot;
use fb_db::queries::analytics::{self, NewBeacon, SnapshotValues};
use fb_db::queries::users;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::dashboard::collect_metrics;
use crate::routes::{page_limit, require_user_id};

/// Longest user-agent or referer kept from a beacon.
const HEADER_KEEP: usize = 200;
const DEFAULT_SNAPSHOT_LIMIT: i64 = 30;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BeaconAck {
    pub ok: bool,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SnapshotParams {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub user_id: Option<String>,
}

fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn header_prefix(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(HEADER_KEEP).collect())
}

/// Optional string member; `null` counts as absent.
fn optional_str(body: &Value, key: &str) -> fb_core::Result<Option<String>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::validation(format!("Invalid {key}"))),
    }
}

/// Check a beacon body's shape: `event` is a non-empty string, `id` and
/// `path` are strings, `ts` is a number.
fn parse_beacon(body: &Value) -> fb_core::Result<NewBeacon> {
    if !body.is_object() {
        return Err(Error::validation("Invalid JSON"));
    }
    let event = match body.get("event") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return Err(Error::validation("Missing event")),
    };
    let path = optional_str(body, "path")?;
    let entity_id = optional_str(body, "id")?;
    let ts = match body.get("ts") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(_) => return Err(Error::validation("Invalid ts")),
    };

    Ok(NewBeacon {
        event,
        entity_id,
        path,
        ts,
        ..NewBeacon::default()
    })
}

/// GET /api/analytics
#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Beacon endpoint is up")
    )
)]
pub async fn analytics_status() -> Response {
    no_store(Json(serde_json::json!({ "status": "ok" })).into_response())
}

/// POST /api/analytics
#[utoipa::path(
    post,
    path = "/api/analytics",
    request_body(content = String, content_type = "application/json", description = "Raw JSON beacon"),
    responses(
        (status = 200, description = "Beacon accepted", body = BeaconAck),
        (status = 400, description = "Malformed beacon")
    )
)]
pub async fn record_beacon(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = async {
        let body: Value =
            serde_json::from_slice(&body).map_err(|_| Error::validation("Invalid JSON"))?;
        let mut beacon = parse_beacon(&body)?;
        beacon.ts = Some(beacon.ts.unwrap_or_else(|| chrono::Utc::now().timestamp_millis()));
        beacon.user_agent = header_prefix(&headers, header::USER_AGENT);
        beacon.referer = header_prefix(&headers, header::REFERER);

        let conn = ctx.conn()?;
        let stored = analytics::record_beacon(&conn, &beacon)?;
        tracing::info!(
            event = %stored.event,
            id = stored.entity_id.as_deref(),
            path = stored.path.as_deref().unwrap_or(""),
            ts = stored.ts,
            ua = stored.user_agent.as_deref().unwrap_or(""),
            referer = stored.referer.as_deref().unwrap_or(""),
            "analytics beacon"
        );
        Ok::<_, AppError>(Json(BeaconAck { ok: true }))
    }
    .await;

    no_store(result.into_response())
}

/// GET /api/analytics/snapshots
#[utoipa::path(
    get,
    path = "/api/analytics/snapshots",
    params(SnapshotParams),
    responses(
        (status = 200, description = "Stored snapshots, newest first", body = Vec<AnalyticsSnapshot>),
        (status = 400, description = "userId missing")
    )
)]
pub async fn list_snapshots(
    State(ctx): State<AppContext>,
    Query(params): Query<SnapshotParams>,
) -> Result<Json<Vec<AnalyticsSnapshot>>, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let limit = page_limit(params.limit, DEFAULT_SNAPSHOT_LIMIT)?;
    let conn = ctx.conn()?;
    Ok(Json(analytics::list_snapshots(&conn, &user_id, limit)?))
}

/// POST /api/analytics/snapshots
#[utoipa::path(
    post,
    path = "/api/analytics/snapshots",
    request_body = SnapshotRequest,
    responses(
        (status = 201, description = "Snapshot stored", body = AnalyticsSnapshot),
        (status = 400, description = "userId missing"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_snapshot(
    State(ctx): State<AppContext>,
    Json(payload): Json<SnapshotRequest>,
) -> Result<(StatusCode, Json<AnalyticsSnapshot>), AppError> {
    let user_id = require_user_id(payload.user_id.as_deref())?;

    let conn = ctx.conn()?;
    if users::get_user_by_id(&conn, &user_id)?.is_none() {
        return Err(Error::not_found("user", &user_id).into());
    }
    let m = collect_metrics(&conn, &user_id)?;
    let values = SnapshotValues {
        total_matches: i64::from(m.saved + m.apps.total_applications),
        applications_in_progress: i64::from(m.apps.in_progress_applications),
        success_rate: i64::from(m.apps.success_rate),
        potential_funding: m.apps.total_requested,
        outreach_count: i64::from(m.outreach.total),
        positive_responses: i64::from(m.outreach.positive),
        readiness_score: i64::from(m.readiness),
    };
    let snapshot = analytics::create_snapshot(&conn, &user_id, &values)?;
    tracing::info!(snapshot_id = %snapshot.id, user_id = %user_id, "Analytics snapshot stored");
    Ok((StatusCode::CREATED, Json(snapshot)))
}
