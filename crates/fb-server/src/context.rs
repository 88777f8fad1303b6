//! Application context shared by every route handler.
//!
//! [`AppContext`] wraps the database pool, the immutable configuration, and
//! the optional rate limiter in cheaply cloneable handles so it can be used as
//! Axum state.

use std::sync::Arc;
use std::time::Instant;

use fb_core::config::Config;
use fb_db::pool::DbPool;

use crate::middleware::rate_limit::{self, SharedLimiter};

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s and pool handles.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Keyed per-IP-per-path limiter; `None` when rate limiting is disabled.
    pub limiter: Option<SharedLimiter>,
    /// Process start, for the health endpoint's uptime.
    pub started_at: Instant,
}

impl AppContext {
    /// Build a context, creating the limiter when the config enables it.
    pub fn new(db: DbPool, config: Config) -> Self {
        let limiter = config
            .rate_limit
            .enabled
            .then(|| rate_limit::create_limiter(config.rate_limit.requests_per_minute));
        Self {
            db,
            config: Arc::new(config),
            limiter,
            started_at: Instant::now(),
        }
    }

    /// Check out a pooled connection.
    pub fn conn(&self) -> fb_core::Result<fb_db::pool::PooledConnection> {
        fb_db::pool::get_conn(&self.db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_db::pool::init_memory_pool;

    #[test]
    fn limiter_follows_config() {
        let mut config = Config::default();
        config.rate_limit.enabled = false;
        let ctx = AppContext::new(init_memory_pool().unwrap(), config);
        assert!(ctx.limiter.is_none());

        let ctx = AppContext::new(init_memory_pool().unwrap(), Config::default());
        assert!(ctx.limiter.is_some());
    }
}
