//! HTTP middleware: request ID, session gate, and rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
