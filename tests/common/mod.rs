//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a test-friendly
//! config, and a full [`AppContext`]. The [`with_server`](TestHarness::with_server)
//! constructor serves the router on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use fb_core::config::Config;
use fb_db::pool::{init_memory_pool, DbPool};
use fb_server::context::AppContext;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub const DEMO_USER: &str = fb_db::seed::DEMO_USER_ID;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    cancel: CancellationToken,
}

/// Defaults for tests: cheap bcrypt and rate limiting off unless a test
/// turns it back on.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.bcrypt_cost = 4;
    config.rate_limit.enabled = false;
    config
}

impl TestHarness {
    /// Start a server with [`test_config`].
    pub async fn with_server() -> Self {
        Self::with_server_config(test_config()).await
    }

    /// Start a server with the demo data set loaded.
    pub async fn seeded() -> Self {
        let h = Self::with_server().await;
        h.seed();
        h
    }

    /// Start a server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(db.clone(), config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        let cancel = CancellationToken::new();
        tokio::spawn(fb_server::serve(listener, ctx.clone(), cancel.clone()));

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            ctx,
            db,
            addr,
            client,
            cancel,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> fb_db::pool::PooledConnection {
        fb_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    pub fn seed(&self) {
        fb_db::seed::seed_demo_data(&self.conn()).expect("seeding failed");
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("GET failed")
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("PUT failed")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed")
    }

    /// GET and decode the body as JSON, asserting the status.
    pub async fn get_json(&self, path: &str, status: u16) -> Value {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), status, "GET {path}");
        resp.json().await.expect("invalid JSON body")
    }

    /// Register an account and return `(user_id, token)`.
    pub async fn register(&self, email: &str) -> (String, String) {
        let resp = self
            .post(
                "/api/auth/register",
                serde_json::json!({
                    "name": "Test Founder",
                    "email": email,
                    "password": "correct horse",
                }),
            )
            .await;
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
