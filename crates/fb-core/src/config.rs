//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! sub-configs for the HTTP server, sessions, rate limiting, and demo seeding.
//! Every section defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Longest session lifetime accepted, ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub seed: SeedConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load configuration strictly: a missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.pool_size == 0 {
            warnings.push("server.pool_size is 0; using 1 connection".into());
        }

        if self.auth.session_ttl_hours == 0 {
            warnings.push("auth.session_ttl_hours is 0; sessions expire immediately".into());
        }

        if self.auth.session_ttl_hours > MAX_SESSION_TTL_HOURS as u64 {
            warnings.push(format!(
                "auth.session_ttl_hours {} exceeds {MAX_SESSION_TTL_HOURS}; login will fail",
                self.auth.session_ttl_hours
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            warnings.push(format!(
                "auth.bcrypt_cost {} is outside 4..=31; registration will fail",
                self.auth.bcrypt_cost
            ));
        }

        if self.rate_limit.enabled && self.rate_limit.requests_per_minute == 0 {
            warnings.push(
                "rate_limit.requests_per_minute is 0; falling back to 60".into(),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server and database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub pool_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            db_path: PathBuf::from("./data/fundboard.db"),
            pool_size: 4,
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_ttl_hours: u64,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24 * 7,
            cookie_secure: false,
            bcrypt_cost: 12,
        }
    }
}

/// Per-IP, per-route request throttling for `/api` routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_minute: u32,
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 60,
            sweep_interval_secs: 300,
        }
    }
}

/// Demo-data seeding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed the demo fixtures when the server starts.
    pub on_startup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.pool_size, 4);
        assert!(cfg.rate_limit.enabled);
        assert_eq!(cfg.rate_limit.requests_per_minute, 60);
        assert!(!cfg.seed.on_startup);
    }

    #[test]
    fn default_config_no_warnings() {
        let warnings = Config::default().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn zero_quota_warns() {
        let mut cfg = Config::default();
        cfg.rate_limit.requests_per_minute = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("requests_per_minute")));
    }

    #[test]
    fn oversized_session_ttl_warns() {
        let mut cfg = Config::default();
        cfg.auth.session_ttl_hours = 10_000_000_000;
        assert!(cfg.validate().iter().any(|w| w.contains("session_ttl_hours")));
        cfg.auth.session_ttl_hours = MAX_SESSION_TTL_HOURS as u64;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn bad_bcrypt_cost_warns() {
        let mut cfg = Config::default();
        cfg.auth.bcrypt_cost = 2;
        assert!(cfg.validate().iter().any(|w| w.contains("bcrypt_cost")));
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "rate_limit": {"requests_per_minute": 5}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.rate_limit.requests_per_minute, 5);
        assert!(cfg.rate_limit.enabled);
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.auth.session_ttl_hours, 168);
    }

    #[test]
    fn malformed_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/fundboard.json")));
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn strict_load_with_missing_file_errors() {
        assert!(Config::load(Path::new("/nonexistent/fundboard.json")).is_err());
    }
}
