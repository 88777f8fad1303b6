//! User CRUD operations.

use fb_core::{time, Error, Result, UserId};
use rusqlite::Connection;

use crate::models::User;

pub(crate) const COLS: &str =
    "id, name, email, email_verified, image, password_hash, created_at, updated_at";

/// Create a new user and return it. Emails are stored lower-cased.
pub fn create_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: Option<&str>,
) -> Result<User> {
    insert_user(conn, &UserId::new(), name, email, password_hash)
}

/// Insert a user with a caller-chosen ID (fixtures use stable keys).
pub fn insert_user(
    conn: &Connection,
    id: &UserId,
    name: &str,
    email: &str,
    password_hash: Option<&str>,
) -> Result<User> {
    let email = email.trim().to_lowercase();
    let now = time::now();

    conn.execute(
        "INSERT INTO users (id, name, email, email_verified, image, password_hash, created_at, updated_at)
         VALUES (?1, ?2, ?3, 0, NULL, ?4, ?5, ?5)",
        rusqlite::params![id.as_str(), name, &email, password_hash, &now],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::Conflict(format!("Email '{email}' is already registered"))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(User {
        id: id.clone(),
        name: name.to_string(),
        email,
        email_verified: false,
        image: None,
        password_hash: password_hash.map(str::to_string),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a user by primary key.
pub fn get_user_by_id(conn: &Connection, id: &UserId) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE id = ?1");
    match conn.query_row(&q, [id.as_str()], User::from_row) {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by email (case-insensitive).
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE email = ?1");
    match conn.query_row(&q, [email.trim().to_lowercase()], User::from_row) {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Update a user's password hash.
pub fn update_password(conn: &Connection, id: &UserId, password_hash: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![password_hash, time::now(), id.as_str()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
