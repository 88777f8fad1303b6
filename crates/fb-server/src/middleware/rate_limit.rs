//! Governor-based rate limiting middleware.
//!
//! Every `/api` request is keyed by `ip:path`, where the IP is the first
//! `X-Forwarded-For` entry, else the socket peer, else `unknown`. Each key
//! gets a GCRA bucket of `requests_per_minute` that fully replenishes over a
//! minute. State is in-memory and process-local.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, OriginalUri, State};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Keyed limiter that reports remaining capacity on every allowed request.
pub type KeyedLimiter =
    RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock, StateInformationMiddleware>;

/// A shared rate limiter instance.
pub type SharedLimiter = Arc<KeyedLimiter>;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// Create a keyed limiter with the given requests-per-minute quota.
/// A zero quota falls back to 60.
pub fn create_limiter(requests_per_minute: u32) -> SharedLimiter {
    let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_PER_MINUTE));
    Arc::new(RateLimiter::keyed(quota).with_middleware::<StateInformationMiddleware>())
}

/// Client IP for rate limiting purposes.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Rate limiting middleware. Returns 429 Too Many Requests when exceeded.
pub async fn rate_limit_middleware(
    State(ctx): State<AppContext>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(limiter) = ctx.limiter.clone() else {
        return next.run(request).await;
    };

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let key = format!("{}:{path}", client_ip(request.headers(), peer));
    let limit = ctx.config.rate_limit.requests_per_minute.max(1);

    match limiter.check_key(&key) {
        Ok(snapshot) => {
            let remaining = snapshot.remaining_burst_capacity();
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            headers.insert(
                X_RATELIMIT_RESET,
                HeaderValue::from(reset_epoch_secs(full_refill(limit, remaining))),
            );
            response
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            let retry_after = retry_after_secs(wait);
            tracing::warn!(%key, retry_after, "Rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(json!({ "error": "Too Many Requests" })),
            )
                .into_response();
            let headers = response.headers_mut();
            headers.insert(axum::http::header::RETRY_AFTER, HeaderValue::from(retry_after));
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
            headers.insert(
                X_RATELIMIT_RESET,
                HeaderValue::from(reset_epoch_secs(Duration::from_secs(retry_after))),
            );
            response
        }
    }
}

/// Whole seconds to wait, rounded up and never zero.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

/// Time until a bucket with `remaining` of `limit` cells is full again.
fn full_refill(limit: u32, remaining: u32) -> Duration {
    let used = limit.saturating_sub(remaining);
    Duration::from_secs(60) * used / limit.max(1)
}

/// Unix time, in whole seconds rounded up, `wait` from now.
fn reset_epoch_secs(wait: Duration) -> i64 {
    let wait = i64::try_from(retry_after_secs(wait)).unwrap_or(i64::MAX);
    chrono::Utc::now().timestamp().saturating_add(wait)
}

/// Periodically drop idle limiter keys and expired sessions until cancelled.
pub async fn run_sweeper(ctx: AppContext, cancel: CancellationToken) {
    let period = Duration::from_secs(ctx.config.rate_limit.sweep_interval_secs.max(1));
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => sweep(&ctx),
            _ = cancel.cancelled() => {
                tracing::debug!("Sweeper stopped");
                return;
            }
        }
    }
}

fn sweep(ctx: &AppContext) {
    if let Some(limiter) = &ctx.limiter {
        limiter.retain_recent();
        limiter.shrink_to_fit();
        tracing::debug!(keys = limiter.len(), "Swept rate limiter");
    }

    match ctx.conn() {
        Ok(conn) => match fb_db::queries::sessions::delete_expired_sessions(&conn, &fb_core::time::now()) {
            Ok(0) => {}
            Ok(n) => tracing::info!(removed = n, "Deleted expired sessions"),
            Err(e) => tracing::warn!("Failed to delete expired sessions: {e}"),
        },
        Err(e) => tracing::warn!("Sweeper could not get a connection: {e}"),
    }
}
