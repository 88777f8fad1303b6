//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; any [`fb_core::Error`]
//! converts with `?` and renders as `{"error", "code", "request_id"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id::current_request_id;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: fb_core::Error,
}

impl AppError {
    pub fn new(inner: fb_core::Error) -> Self {
        Self { inner }
    }
}

impl From<fb_core::Error> for AppError {
    fn from(e: fb_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = current_request_id();
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = ?request_id,
                "Server error in API handler"
            );
            "Internal server error".to_string()
        } else {
            self.inner.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.inner.code(),
            "request_id": request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
