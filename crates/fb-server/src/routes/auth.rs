//! Authentication route handlers: register, login, logout, session.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, Extensions, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use fb_core::config::MAX_SESSION_TTL_HOURS;
use fb_db::models::User;
use fb_db::queries::{sessions, users};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::auth::{extract_token, session_user, SESSION_COOKIE};
use crate::middleware::rate_limit::client_ip;
use crate::routes::required;

const MIN_PASSWORD_LEN: usize = 8;

/// Registration payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued session.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_at: String,
}

/// Current session.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub user: User,
}

fn hash_password(ctx: &AppContext, password: &str) -> fb_core::Result<String> {
    bcrypt::hash(password, ctx.config.auth.bcrypt_cost)
        .map_err(|e| fb_core::Error::Internal(format!("bcrypt error: {e}")))
}

fn session_cookie(ctx: &AppContext, token: &str, max_age_secs: i64) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if ctx.config.auth.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Expiry instant and lifetime in hours for a session created now.
fn session_expiry(ctx: &AppContext) -> fb_core::Result<(DateTime<Utc>, i64)> {
    let configured = ctx.config.auth.session_ttl_hours;
    i64::try_from(configured)
        .ok()
        .filter(|h| *h <= MAX_SESSION_TTL_HOURS)
        .and_then(|h| Duration::try_hours(h).map(|ttl| (h, ttl)))
        .and_then(|(h, ttl)| Utc::now().checked_add_signed(ttl).map(|at| (at, h)))
        .ok_or_else(|| {
            fb_core::Error::Internal(format!("auth.session_ttl_hours {configured} is out of range"))
        })
}

/// Create a session row for `user` and build the response carrying the
/// token in both the body and a cookie.
fn issue_session(
    ctx: &AppContext,
    user: User,
    status: StatusCode,
    headers: &HeaderMap,
    extensions: &Extensions,
) -> Result<Response, AppError> {
    let (expires, ttl_hours) = session_expiry(ctx)?;
    let expires_at = fb_core::time::format(expires);

    let conn = ctx.conn()?;
    let token = uuid::Uuid::new_v4().simple().to_string();

    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(headers, peer);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.chars().take(200).collect::<String>());

    sessions::create_session(
        &conn,
        &user.id,
        &token,
        &expires_at,
        Some(&ip),
        user_agent.as_deref(),
    )?;
    tracing::info!(user_id = %user.id, "Session created");

    let cookie = session_cookie(ctx, &token, ttl_hours.saturating_mul(3600));
    let mut response = (
        status,
        Json(AuthResponse {
            user,
            token,
            expires_at,
        }),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid registration"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = required(&payload.name, "name")?;
    let email = required(&payload.email, "email")?;
    let password = payload.password.as_deref().unwrap_or_default();

    if !email.contains('@') {
        return Err(fb_core::Error::validation("email is invalid").into());
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(fb_core::Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    // Fail before any write when sessions cannot be issued.
    session_expiry(&ctx)?;
    let hash = hash_password(&ctx, password)?;
    let user = {
        let conn = ctx.conn()?;
        users::create_user(&conn, name, email, Some(&hash))?
    };
    tracing::info!(user_id = %user.id, "User registered");

    issue_session(&ctx, user, StatusCode::CREATED, &headers, &extensions)
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = required(&payload.email, "email")?;
    let password = required(&payload.password, "password")?;

    let user = {
        let conn = ctx.conn()?;
        users::get_user_by_email(&conn, email)?
    };
    let invalid = || AppError::from(fb_core::Error::Unauthorized("Invalid credentials".into()));

    let Some(user) = user else {
        return Err(invalid());
    };
    // Seeded accounts carry no password and cannot log in.
    let Some(stored) = user.password_hash.as_deref() else {
        return Err(invalid());
    };
    if !bcrypt::verify(password, stored).unwrap_or(false) {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(invalid());
    }

    issue_session(&ctx, user, StatusCode::OK, &headers, &extensions)
}

/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = extract_token(&headers) {
        let conn = ctx.conn()?;
        if let Some(session) = sessions::get_session(&conn, &token)? {
            sessions::delete_session(&conn, &token)?;
            tracing::info!(user_id = %session.user_id, "Session ended");
        }
    }

    let mut response = Json(serde_json::json!({ "success": true })).into_response();
    if let Ok(value) = HeaderValue::from_str(&session_cookie(&ctx, "", 0)) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session user", body = SessionResponse),
        (status = 401, description = "No valid session")
    )
)]
pub async fn current_session(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AppError> {
    match session_user(&ctx, &headers)? {
        Some(user) => Ok(Json(SessionResponse { user })),
        None => Err(fb_core::Error::Unauthorized("no valid session".into()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::config::Config;
    use fb_db::pool::init_memory_pool;

    fn ctx_with_ttl(hours: u64) -> AppContext {
        let mut config = Config::default();
        config.auth.session_ttl_hours = hours;
        AppContext::new(init_memory_pool().unwrap(), config)
    }

    #[test]
    fn expiry_follows_ttl() {
        let (at, hours) = session_expiry(&ctx_with_ttl(24)).unwrap();
        assert_eq!(hours, 24);
        assert!(at > Utc::now() + Duration::hours(23));
    }

    #[test]
    fn oversized_ttl_is_an_error() {
        let err = session_expiry(&ctx_with_ttl(10_000_000_000)).unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert!(session_expiry(&ctx_with_ttl(u64::MAX)).is_err());
    }
}
