//! Session resolution and the root-path auth gate.
//!
//! A session token is accepted from `Authorization: Bearer <token>` or the
//! `fundboard_session` cookie. The API itself is not gated; only `GET /`
//! redirects anonymous visitors to `/login`.

use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use fb_db::models::User;

use crate::context::AppContext;

/// Cookie name for browser sessions.
pub const SESSION_COOKIE: &str = "fundboard_session";

/// Where anonymous visitors to `/` are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extract a bearer token or session cookie from request headers.
///
/// The bearer header takes precedence over the cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    let cookies = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;
    let prefix = format!("{SESSION_COOKIE}=");
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix(&prefix))
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Resolve the user behind the request's session token, if it is unexpired.
pub fn session_user(ctx: &AppContext, headers: &HeaderMap) -> fb_core::Result<Option<User>> {
    let Some(token) = extract_token(headers) else {
        return Ok(None);
    };
    let conn = ctx.conn()?;
    fb_db::queries::sessions::get_session_user(&conn, &token, &fb_core::time::now())
}

/// Redirect (307) to the login page unless the request carries a valid
/// session. On success the session's [`User`] is placed in request
/// extensions.
pub async fn require_session(
    State(ctx): State<AppContext>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match session_user(&ctx, request.headers()) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => Redirect::temporary(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::warn!("Session lookup failed: {e}");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
