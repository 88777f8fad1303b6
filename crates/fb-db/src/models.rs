//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row` selected with the matching query module's column list.
//! Models serialize in camelCase so handlers can return them as-is.

use fb_core::{
    ApplicationId, ApplicationStatus, BeaconId, ComplianceItemId, DocumentId, DocumentKind,
    EventId, EventKind, HistoryId, InvestorId, InvestorKind, OpportunityId, OpportunityKind,
    OutreachId, OutreachKind, OutreachStatus, ProfileId, SavedOpportunityId, SessionId,
    SnapshotId, UserId,
};
use rusqlite::types::Type;
use serde::Serialize;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn id<T: From<String>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    row.get::<_, String>(idx).map(T::from)
}

fn opt_id<T: From<String>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    Ok(row.get::<_, Option<String>>(idx)?.map(T::from))
}

/// Parse a stored enum string through its `FromStr` impl.
fn parse_enum<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = fb_core::Error>,
{
    let s: String = row.get(idx)?;
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a JSON text array column; NULL reads as empty.
fn json_list(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) if !v.is_empty() => serde_json::from_str(&v)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(Vec::new()),
    }
}

/// Encode a string list for a JSON text column.
pub fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

// ---------------------------------------------------------------------------
// User / Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            email_verified: row.get(3)?,
            image: row.get(4)?,
            password_hash: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}

impl Session {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: id(row, 1)?,
            token: row.get(2)?,
            expires_at: row.get(3)?,
            ip_address: row.get(4)?,
            user_agent: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub industry: String,
    pub location: String,
    pub amount_min: i64,
    pub amount_max: i64,
    pub currency: String,
    pub deadline: String,
    pub eligibility: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub process: Vec<String>,
    pub url: Option<String>,
    pub score: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Opportunity {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            title: row.get(1)?,
            kind: parse_enum(row, 2)?,
            industry: row.get(3)?,
            location: row.get(4)?,
            amount_min: row.get(5)?,
            amount_max: row.get(6)?,
            currency: row.get(7)?,
            deadline: row.get(8)?,
            eligibility: row.get(9)?,
            description: row.get(10)?,
            requirements: json_list(row, 11)?,
            process: json_list(row, 12)?,
            url: row.get(13)?,
            score: row.get(14)?,
            is_active: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedOpportunity {
    pub id: SavedOpportunityId,
    pub user_id: UserId,
    pub opportunity_id: OpportunityId,
    pub created_at: String,
}

impl SavedOpportunity {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: id(row, 1)?,
            opportunity_id: id(row, 2)?,
            created_at: row.get(3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Application and its child rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub opportunity_id: Option<OpportunityId>,
    pub name: String,
    pub source: String,
    pub amount_requested: i64,
    pub status: ApplicationStatus,
    pub submission_date: Option<String>,
    pub deadline: Option<String>,
    pub next_action: Option<String>,
    pub insights: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Application {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: id(row, 1)?,
            opportunity_id: opt_id(row, 2)?,
            name: row.get(3)?,
            source: row.get(4)?,
            amount_requested: row.get(5)?,
            status: parse_enum(row, 6)?,
            submission_date: row.get(7)?,
            deadline: row.get(8)?,
            next_action: row.get(9)?,
            insights: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocument {
    pub id: DocumentId,
    pub application_id: ApplicationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub url: Option<String>,
    pub updated_at: String,
}

impl ApplicationDocument {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            application_id: id(row, 1)?,
            name: row.get(2)?,
            kind: parse_enum(row, 3)?,
            url: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub application_id: ApplicationId,
    pub event: String,
    pub at: String,
    pub by: Option<String>,
}

impl HistoryEntry {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            application_id: id(row, 1)?,
            event: row.get(2)?,
            at: row.get(3)?,
            by: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceItem {
    pub id: ComplianceItemId,
    pub application_id: ApplicationId,
    pub label: String,
    pub done: bool,
}

impl ComplianceItem {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            application_id: id(row, 1)?,
            label: row.get(2)?,
            done: row.get(3)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Investor / Outreach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Investor {
    pub id: InvestorId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InvestorKind,
    pub stages: Vec<String>,
    pub industries: Vec<String>,
    pub geo: Vec<String>,
    pub funding_min: i64,
    pub funding_max: i64,
    pub portfolio: Vec<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub match_score: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Investor {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            name: row.get(1)?,
            kind: parse_enum(row, 2)?,
            stages: json_list(row, 3)?,
            industries: json_list(row, 4)?,
            geo: json_list(row, 5)?,
            funding_min: row.get(6)?,
            funding_max: row.get(7)?,
            portfolio: json_list(row, 8)?,
            email: row.get(9)?,
            linkedin: row.get(10)?,
            website: row.get(11)?,
            match_score: row.get(12)?,
            is_active: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outreach {
    pub id: OutreachId,
    pub user_id: UserId,
    pub investor_id: InvestorId,
    #[serde(rename = "type")]
    pub kind: OutreachKind,
    pub status: OutreachStatus,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Outreach {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: id(row, 1)?,
            investor_id: id(row, 2)?,
            kind: parse_enum(row, 3)?,
            status: parse_enum(row, 4)?,
            subject: row.get(5)?,
            message: row.get(6)?,
            notes: row.get(7)?,
            scheduled_date: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

// ---------------------------------------------------------------------------
// StartupProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartupProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub name: String,
    pub tagline: Option<String>,
    pub stage: Option<String>,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub funding_need: Option<String>,
    pub summary: Option<String>,
    pub website: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl StartupProfile {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: id(row, 1)?,
            name: row.get(2)?,
            tagline: row.get(3)?,
            stage: row.get(4)?,
            industry: row.get(5)?,
            region: row.get(6)?,
            funding_need: row.get(7)?,
            summary: row.get(8)?,
            website: row.get(9)?,
            is_public: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub industries: Vec<String>,
    pub ai_recommended: bool,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl Event {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            title: row.get(1)?,
            date: row.get(2)?,
            location: row.get(3)?,
            kind: parse_enum(row, 4)?,
            industries: json_list(row, 5)?,
            ai_recommended: row.get(6)?,
            image_url: row.get(7)?,
            description: row.get(8)?,
            website_url: row.get(9)?,
            is_active: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub id: SnapshotId,
    pub user_id: Option<UserId>,
    pub date: String,
    pub total_matches: i64,
    pub applications_in_progress: i64,
    pub success_rate: i64,
    pub potential_funding: i64,
    pub outreach_count: i64,
    pub positive_responses: i64,
    pub readiness_score: i64,
}

impl AnalyticsSnapshot {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            user_id: opt_id(row, 1)?,
            date: row.get(2)?,
            total_matches: row.get(3)?,
            applications_in_progress: row.get(4)?,
            success_rate: row.get(5)?,
            potential_funding: row.get(6)?,
            outreach_count: row.get(7)?,
            positive_responses: row.get(8)?,
            readiness_score: row.get(9)?,
        })
    }
}

/// A received client beacon.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: BeaconId,
    pub event: String,
    pub entity_id: Option<String>,
    pub path: Option<String>,
    pub ts: Option<i64>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub received_at: String,
}

impl AnalyticsEvent {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id(row, 0)?,
            event: row.get(1)?,
            entity_id: row.get(2)?,
            path: row.get(3)?,
            ts: row.get(4)?,
            user_agent: row.get(5)?,
            referer: row.get(6)?,
            received_at: row.get(7)?,
        })
    }
}

/// An application with its documents, history (newest first), and
/// compliance checklist.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub documents: Vec<ApplicationDocument>,
    pub history: Vec<HistoryEntry>,
    pub compliance: Vec<ComplianceItem>,
}
