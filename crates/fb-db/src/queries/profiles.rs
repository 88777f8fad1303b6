//! Startup profile operations. A user owns at most one profile.

use fb_core::{time, Error, ProfileId, Result, UserId};
use rusqlite::Connection;

use crate::models::StartupProfile;

const COLS: &str = "id, user_id, name, tagline, stage, industry, region, funding_need, \
     summary, website, is_public, created_at, updated_at";

/// How a caller identifies a profile.
#[derive(Debug, Clone)]
pub enum ProfileKey {
    Id(ProfileId),
    User(UserId),
}

impl ProfileKey {
    fn column(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::User(_) => "user_id",
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::Id(id) => id.as_str(),
            Self::User(id) => id.as_str(),
        }
    }
}

/// Profile content. On upsert every field is written, so `None` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub name: String,
    pub tagline: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub funding_need: Option<String>,
    pub summary: Option<String>,
    pub website: Option<String>,
    pub is_public: bool,
}

pub fn get_profile(conn: &Connection, key: &ProfileKey) -> Result<Option<StartupProfile>> {
    let q = format!(
        "SELECT {COLS} FROM startup_profiles WHERE {} = ?1",
        key.column()
    );
    match conn.query_row(&q, [key.value()], StartupProfile::from_row) {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Create the user's profile or overwrite the existing one in a single
/// statement. The flag is true when a new row was created.
pub fn upsert_profile(
    conn: &Connection,
    user_id: &UserId,
    fields: &ProfileFields,
) -> Result<(StartupProfile, bool)> {
    let candidate = ProfileId::new();
    let q = format!(
        "INSERT INTO startup_profiles
         (id, user_id, name, tagline, stage, industry, region, funding_need, summary,
          website, is_public, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
         ON CONFLICT(user_id) DO UPDATE SET
            name = excluded.name,
            tagline = excluded.tagline,
            stage = excluded.stage,
            industry = excluded.industry,
            region = excluded.region,
            funding_need = excluded.funding_need,
            summary = excluded.summary,
            website = excluded.website,
            is_public = excluded.is_public,
            updated_at = excluded.updated_at
         RETURNING {COLS}"
    );
    let profile = conn
        .query_row(
            &q,
            rusqlite::params![
                candidate.as_str(),
                user_id.as_str(),
                &fields.name,
                &fields.tagline,
                &fields.stage,
                &fields.industry,
                &fields.region,
                &fields.funding_need,
                &fields.summary,
                &fields.website,
                fields.is_public,
                time::now(),
            ],
            StartupProfile::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?;

    // An existing row keeps its id.
    let created = profile.id == candidate;
    Ok((profile, created))
}

/// Partial profile update; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub funding_need: Option<String>,
    pub summary: Option<String>,
    pub website: Option<String>,
    pub is_public: Option<bool>,
}

/// Apply `patch`; `None` if no profile matches `key`.
pub fn update_profile(
    conn: &Connection,
    key: &ProfileKey,
    patch: &ProfilePatch,
) -> Result<Option<StartupProfile>> {
    let q = format!(
        "UPDATE startup_profiles SET
            name = COALESCE(?1, name),
            tagline = COALESCE(?2, tagline),
            stage = COALESCE(?3, stage),
            industry = COALESCE(?4, industry),
            region = COALESCE(?5, region),
            funding_need = COALESCE(?6, funding_need),
            summary = COALESCE(?7, summary),
            website = COALESCE(?8, website),
            is_public = COALESCE(?9, is_public),
            updated_at = ?10
         WHERE {} = ?11",
        key.column()
    );
    let n = conn
        .execute(
            &q,
            rusqlite::params![
                patch.name.as_deref().filter(|n| !n.is_empty()),
                &patch.tagline,
                &patch.stage,
                &patch.industry,
                &patch.region,
                &patch.funding_need,
                &patch.summary,
                &patch.website,
                patch.is_public,
                time::now(),
                key.value(),
            ],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }
    get_profile(conn, key)
}
