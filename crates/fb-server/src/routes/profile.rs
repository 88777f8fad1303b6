//! Startup profile: fetch, upsert, patch.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use fb_core::{Error, ProfileId, UserId};
use fb_db::models::StartupProfile;
use fb_db::queries::profiles::{self, ProfileFields, ProfileKey, ProfilePatch};
use fb_db::queries::users;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::filter_value;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProfileParams {
    /// Profile ID; takes precedence over `userId`.
    pub id: Option<String>,
    pub user_id: Option<String>,
}

/// Full profile body for upserts.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub funding_need: Option<String>,
    pub summary: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Partial profile body; the profile is addressed by `id` or `userId`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchProfileRequest {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub funding_need: Option<String>,
    pub summary: Option<String>,
    pub website: Option<String>,
    pub is_public: Option<bool>,
}

fn profile_key(id: Option<&str>, user_id: Option<&str>) -> fb_core::Result<ProfileKey> {
    let non_blank = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
    match (non_blank(id), non_blank(user_id)) {
        (Some(id), _) => Ok(ProfileKey::Id(ProfileId::from(id))),
        (None, Some(uid)) => Ok(ProfileKey::User(UserId::from(uid))),
        (None, None) => Err(Error::validation("userId or id is required")),
    }
}

fn not_found(key: &ProfileKey) -> Error {
    match key {
        ProfileKey::Id(id) => Error::not_found("profile", id),
        ProfileKey::User(uid) => Error::not_found("profile for user", uid),
    }
}

/// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    params(ProfileParams),
    responses(
        (status = 200, description = "Startup profile", body = StartupProfile),
        (status = 400, description = "Neither id nor userId given"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(ctx): State<AppContext>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<StartupProfile>, AppError> {
    let key = profile_key(params.id.as_deref(), params.user_id.as_deref())?;
    let conn = ctx.conn()?;
    let profile = profiles::get_profile(&conn, &key)?.ok_or_else(|| not_found(&key))?;
    Ok(Json(profile))
}

/// POST /api/profile
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = StartupProfile),
        (status = 200, description = "Profile replaced", body = StartupProfile),
        (status = 400, description = "userId or name missing"),
        (status = 404, description = "User not found")
    )
)]
pub async fn upsert_profile(
    State(ctx): State<AppContext>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<(StatusCode, Json<StartupProfile>), AppError> {
    let (Some(user_id), Some(name)) = (
        filter_value(payload.user_id.as_deref()),
        payload.name.as_deref().map(str::trim).filter(|v| !v.is_empty()),
    ) else {
        return Err(Error::validation("userId and name are required").into());
    };
    let user_id = UserId::from(user_id.to_string());

    let fields = ProfileFields {
        name: name.to_string(),
        tagline: payload.tagline,
        stage: payload.stage,
        industry: payload.industry,
        region: payload.region,
        funding_need: payload.funding_need,
        summary: payload.summary,
        website: payload.website,
        is_public: payload.is_public,
    };

    let conn = ctx.conn()?;
    if users::get_user_by_id(&conn, &user_id)?.is_none() {
        return Err(Error::not_found("user", &user_id).into());
    }
    let (profile, created) = profiles::upsert_profile(&conn, &user_id, &fields)?;
    tracing::info!(profile_id = %profile.id, created, "Profile saved");

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(profile)))
}

/// PUT /api/profile
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = PatchProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = StartupProfile),
        (status = 400, description = "Neither id nor userId given"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn patch_profile(
    State(ctx): State<AppContext>,
    Json(payload): Json<PatchProfileRequest>,
) -> Result<Json<StartupProfile>, AppError> {
    let key = profile_key(payload.id.as_deref(), payload.user_id.as_deref())?;
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(Error::validation("name must not be blank").into());
    }
    let patch = ProfilePatch {
        name: payload.name,
        tagline: payload.tagline,
        stage: payload.stage,
        industry: payload.industry,
        region: payload.region,
        funding_need: payload.funding_need,
        summary: payload.summary,
        website: payload.website,
        is_public: payload.is_public,
    };

    let conn = ctx.conn()?;
    let profile = profiles::update_profile(&conn, &key, &patch)?.ok_or_else(|| not_found(&key))?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_takes_precedence_over_user() {
        let key = profile_key(Some("profile_001"), Some("demo_user_001")).unwrap();
        assert!(matches!(key, ProfileKey::Id(id) if id.as_str() == "profile_001"));
    }

    #[test]
    fn blank_keys_are_rejected() {
        let err = profile_key(Some("  "), None).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(matches!(
            profile_key(None, Some("u1")).unwrap(),
            ProfileKey::User(_)
        ));
    }
}
