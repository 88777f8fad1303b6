//! Saved-opportunity bookmarks.

use std::collections::HashSet;

use fb_core::{time, Error, OpportunityId, Result, SavedOpportunityId, UserId};
use rusqlite::Connection;

use crate::models::SavedOpportunity;

const COLS: &str = "id, user_id, opportunity_id, created_at";

/// Bookmark an opportunity for a user. No-op if already saved; the
/// existing row is returned in that case.
pub fn save_opportunity(
    conn: &Connection,
    user_id: &UserId,
    opportunity_id: &OpportunityId,
) -> Result<SavedOpportunity> {
    conn.execute(
        "INSERT OR IGNORE INTO user_saved_opportunities (id, user_id, opportunity_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            SavedOpportunityId::new().as_str(),
            user_id.as_str(),
            opportunity_id.as_str(),
            time::now()
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_saved(conn, user_id, opportunity_id)?
        .ok_or_else(|| Error::not_found("saved opportunity", opportunity_id))
}

/// Remove a bookmark. Returns true if one was removed.
pub fn unsave_opportunity(
    conn: &Connection,
    user_id: &UserId,
    opportunity_id: &OpportunityId,
) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM user_saved_opportunities WHERE user_id = ?1 AND opportunity_id = ?2",
            rusqlite::params![user_id.as_str(), opportunity_id.as_str()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

pub fn get_saved(
    conn: &Connection,
    user_id: &UserId,
    opportunity_id: &OpportunityId,
) -> Result<Option<SavedOpportunity>> {
    let q = format!(
        "SELECT {COLS} FROM user_saved_opportunities WHERE user_id = ?1 AND opportunity_id = ?2"
    );
    match conn.query_row(
        &q,
        rusqlite::params![user_id.as_str(), opportunity_id.as_str()],
        SavedOpportunity::from_row,
    ) {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// IDs of every opportunity a user has saved.
pub fn saved_ids(conn: &Connection, user_id: &UserId) -> Result<HashSet<OpportunityId>> {
    let mut stmt = conn
        .prepare("SELECT opportunity_id FROM user_saved_opportunities WHERE user_id = ?1")
        .map_err(|e| Error::database(e.to_string()))?;
    let ids = stmt
        .query_map([user_id.as_str()], |row| row.get::<_, String>(0))
        .map_err(|e| Error::database(e.to_string()))?
        .map(|r| r.map(OpportunityId::from))
        .collect::<std::result::Result<HashSet<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(ids)
}

pub fn count_saved(conn: &Connection, user_id: &UserId) -> Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_saved_opportunities WHERE user_id = ?1",
        [user_id.as_str()],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}
