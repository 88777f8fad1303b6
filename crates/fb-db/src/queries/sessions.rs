//! Login session operations.

use fb_core::{time, Error, Result, SessionId, UserId};
use rusqlite::Connection;

use crate::models::{Session, User};

const COLS: &str = "id, user_id, token, expires_at, ip_address, user_agent, created_at";

/// Create a new session for a user.
pub fn create_session(
    conn: &Connection,
    user_id: &UserId,
    token: &str,
    expires_at: &str,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<Session> {
    let id = SessionId::new();
    let now = time::now();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at, ip_address, user_agent, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![id.as_str(), user_id.as_str(), token, expires_at, ip_address, user_agent, &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Session {
        id,
        user_id: user_id.clone(),
        token: token.to_string(),
        expires_at: expires_at.to_string(),
        ip_address: ip_address.map(str::to_string),
        user_agent: user_agent.map(str::to_string),
        created_at: now,
    })
}

/// Look up a session by its token value.
pub fn get_session(conn: &Connection, token: &str) -> Result<Option<Session>> {
    let q = format!("SELECT {COLS} FROM sessions WHERE token = ?1");
    match conn.query_row(&q, [token], Session::from_row) {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Resolve a token to its user when the session has not expired.
pub fn get_session_user(conn: &Connection, token: &str, now: &str) -> Result<Option<User>> {
    let q = format!(
        "SELECT {} FROM users u JOIN sessions s ON s.user_id = u.id
         WHERE s.token = ?1 AND s.expires_at > ?2",
        qualified_user_cols()
    );
    match conn.query_row(&q, [token, now], User::from_row) {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

fn qualified_user_cols() -> String {
    super::users::COLS
        .split(", ")
        .map(|c| format!("u.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Delete a specific session by token.
pub fn delete_session(conn: &Connection, token: &str) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM sessions WHERE token = ?1", [token])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete all sessions whose `expires_at` is not after `now`.
pub fn delete_expired_sessions(conn: &Connection, now: &str) -> Result<usize> {
    conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now])
        .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::users;

    #[test]
    fn create_get_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "Sam", "sam@example.com", None).unwrap();

        let s = create_session(&conn, &user.id, "abc123", "2099-01-01T00:00:00Z", None, Some("curl"))
            .unwrap();
        assert!(s.id.as_str().starts_with("sess_"));

        let found = get_session(&conn, "abc123").unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert_eq!(found.user_agent.as_deref(), Some("curl"));

        assert!(delete_session(&conn, "abc123").unwrap());
        assert!(get_session(&conn, "abc123").unwrap().is_none());
    }

    #[test]
    fn session_user_respects_expiry() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "Eve", "eve@example.com", None).unwrap();
        create_session(&conn, &user.id, "live", "2099-01-01T00:00:00Z", None, None).unwrap();
        create_session(&conn, &user.id, "stale", "2000-01-01T00:00:00Z", None, None).unwrap();

        let now = "2025-06-01T00:00:00Z";
        let u = get_session_user(&conn, "live", now).unwrap().unwrap();
        assert_eq!(u.email, "eve@example.com");
        assert!(get_session_user(&conn, "stale", now).unwrap().is_none());
        assert!(get_session_user(&conn, "missing", now).unwrap().is_none());
    }

    #[test]
    fn sweep_expired() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "Old", "old@example.com", None).unwrap();
        create_session(&conn, &user.id, "old", "2000-01-01T00:00:00Z", None, None).unwrap();
        create_session(&conn, &user.id, "new", "2099-01-01T00:00:00Z", None, None).unwrap();

        assert_eq!(delete_expired_sessions(&conn, "2025-06-01T00:00:00Z").unwrap(), 1);
        assert!(get_session(&conn, "new").unwrap().is_some());
    }
}
