//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use fb_core::{Error, Result};
use rusqlite::Connection;

/// V1: initial schema -- every funding table plus users and sessions.
const V1_INITIAL: &str = r#"
-- Users and sessions
CREATE TABLE users (
    id             TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    email          TEXT UNIQUE NOT NULL,
    email_verified INTEGER NOT NULL DEFAULT 0,
    image          TEXT,
    password_hash  TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE sessions (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token      TEXT UNIQUE NOT NULL,
    expires_at TEXT NOT NULL,
    ip_address TEXT,
    user_agent TEXT,
    created_at TEXT NOT NULL
);

-- Funding opportunities
CREATE TABLE funding_opportunities (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    type         TEXT NOT NULL,
    industry     TEXT NOT NULL,
    location     TEXT NOT NULL,
    amount_min   INTEGER NOT NULL,
    amount_max   INTEGER NOT NULL,
    currency     TEXT NOT NULL DEFAULT 'USD',
    deadline     TEXT NOT NULL,
    eligibility  TEXT NOT NULL,
    description  TEXT NOT NULL,
    requirements TEXT NOT NULL DEFAULT '[]',
    process      TEXT NOT NULL DEFAULT '[]',
    url          TEXT,
    score        INTEGER NOT NULL DEFAULT 0,
    is_active    INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE user_saved_opportunities (
    id             TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    opportunity_id TEXT NOT NULL REFERENCES funding_opportunities(id) ON DELETE CASCADE,
    created_at     TEXT NOT NULL,
    UNIQUE(user_id, opportunity_id)
);

-- Applications
CREATE TABLE applications (
    id               TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    opportunity_id   TEXT REFERENCES funding_opportunities(id) ON DELETE SET NULL,
    name             TEXT NOT NULL,
    source           TEXT NOT NULL,
    amount_requested INTEGER NOT NULL,
    status           TEXT NOT NULL DEFAULT 'draft',
    submission_date  TEXT,
    deadline         TEXT,
    next_action      TEXT,
    insights         TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE application_documents (
    id             TEXT PRIMARY KEY,
    application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    name           TEXT NOT NULL,
    type           TEXT NOT NULL,
    url            TEXT,
    updated_at     TEXT NOT NULL
);

CREATE TABLE application_history (
    id             TEXT PRIMARY KEY,
    application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    event          TEXT NOT NULL,
    at             TEXT NOT NULL,
    by             TEXT
);

CREATE TABLE compliance_items (
    id             TEXT PRIMARY KEY,
    application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    label          TEXT NOT NULL,
    done           INTEGER NOT NULL DEFAULT 0
);

-- Investors and outreach
CREATE TABLE investors (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    type        TEXT NOT NULL,
    stages      TEXT NOT NULL DEFAULT '[]',
    industries  TEXT NOT NULL DEFAULT '[]',
    geo         TEXT NOT NULL DEFAULT '[]',
    funding_min INTEGER NOT NULL,
    funding_max INTEGER NOT NULL,
    portfolio   TEXT NOT NULL DEFAULT '[]',
    email       TEXT,
    linkedin    TEXT,
    website     TEXT,
    match_score INTEGER NOT NULL DEFAULT 0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE user_outreach (
    id             TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    investor_id    TEXT NOT NULL REFERENCES investors(id) ON DELETE CASCADE,
    type           TEXT NOT NULL,
    status         TEXT NOT NULL DEFAULT 'pending',
    subject        TEXT,
    message        TEXT,
    notes          TEXT,
    scheduled_date TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Profiles
CREATE TABLE startup_profiles (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    tagline      TEXT,
    stage        TEXT,
    industry     TEXT,
    region       TEXT,
    funding_need TEXT,
    summary      TEXT,
    website      TEXT,
    is_public    INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- Events
CREATE TABLE events (
    id             TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    date           TEXT NOT NULL,
    location       TEXT NOT NULL,
    type           TEXT NOT NULL,
    industries     TEXT NOT NULL DEFAULT '[]',
    ai_recommended INTEGER NOT NULL DEFAULT 0,
    image_url      TEXT,
    description    TEXT,
    website_url    TEXT,
    is_active      INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL
);

-- Analytics snapshots
CREATE TABLE analytics (
    id                       TEXT PRIMARY KEY,
    user_id                  TEXT REFERENCES users(id) ON DELETE CASCADE,
    date                     TEXT NOT NULL,
    total_matches            INTEGER NOT NULL DEFAULT 0,
    applications_in_progress INTEGER NOT NULL DEFAULT 0,
    success_rate             INTEGER NOT NULL DEFAULT 0,
    potential_funding        INTEGER NOT NULL DEFAULT 0,
    outreach_count           INTEGER NOT NULL DEFAULT 0,
    positive_responses       INTEGER NOT NULL DEFAULT 0,
    readiness_score          INTEGER NOT NULL DEFAULT 0
);

-- Indexes
CREATE INDEX idx_sessions_user ON sessions(user_id);
CREATE INDEX idx_sessions_expires ON sessions(expires_at);
CREATE INDEX idx_opportunities_score ON funding_opportunities(is_active, score DESC);
CREATE INDEX idx_saved_user ON user_saved_opportunities(user_id);
CREATE INDEX idx_applications_user ON applications(user_id, updated_at DESC);
CREATE INDEX idx_documents_application ON application_documents(application_id);
CREATE INDEX idx_history_application ON application_history(application_id, at DESC);
CREATE INDEX idx_compliance_application ON compliance_items(application_id);
CREATE INDEX idx_investors_score ON investors(is_active, match_score DESC);
CREATE INDEX idx_outreach_user ON user_outreach(user_id, investor_id);
CREATE INDEX idx_events_date ON events(is_active, date);
CREATE INDEX idx_analytics_user ON analytics(user_id, date DESC);
"#;

/// V2: beacon log for client-side analytics events.
const V2_ANALYTICS_EVENTS: &str = r#"
CREATE TABLE analytics_events (
    id          TEXT PRIMARY KEY,
    event       TEXT NOT NULL,
    entity_id   TEXT,
    path        TEXT,
    ts          INTEGER,
    user_agent  TEXT,
    referer     TEXT,
    received_at TEXT NOT NULL
);

CREATE INDEX idx_analytics_events_event ON analytics_events(event, received_at DESC);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_ANALYTICS_EVENTS)];

/// Run all pending migrations against `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each migration whose version is not yet recorded.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if applied {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(version, "applied database migration");
    }

    Ok(())
}

/// Highest migration version recorded in `schema_migrations`.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}
