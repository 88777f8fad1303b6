//! Funding-domain enums: opportunity kinds, application statuses, investor
//! kinds, outreach states, document kinds, and event kinds.
//!
//! Every enum round-trips through the exact string stored in SQLite via
//! [`as_str`](ApplicationStatus::as_str) / `FromStr`, and serializes the same
//! way through serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

fn unknown(kind: &str, value: &str, valid: &[&str]) -> Error {
    Error::Validation(format!(
        "unknown {kind} '{value}' (valid: {})",
        valid.join(", ")
    ))
}

// ---------------------------------------------------------------------------
// OpportunityKind
// ---------------------------------------------------------------------------

/// Kind of funding program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    Grant,
    Vc,
    Angel,
    Loan,
}

impl OpportunityKind {
    pub const ALL: [&'static str; 4] = ["grant", "vc", "angel", "loan"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Vc => "vc",
            Self::Angel => "angel",
            Self::Loan => "loan",
        }
    }
}

impl FromStr for OpportunityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grant" => Ok(Self::Grant),
            "vc" => Ok(Self::Vc),
            "angel" => Ok(Self::Angel),
            "loan" => Ok(Self::Loan),
            other => Err(unknown("opportunity type", other, &Self::ALL)),
        }
    }
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicationStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a funding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [&'static str; 5] =
        ["draft", "submitted", "under_review", "approved", "rejected"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Draft, submitted, and under-review applications count as in progress.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Draft | Self::Submitted | Self::UnderReview)
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(unknown("application status", other, &Self::ALL)),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InvestorKind
// ---------------------------------------------------------------------------

/// Kind of investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvestorKind {
    Vc,
    Angel,
    Strategic,
}

impl InvestorKind {
    pub const ALL: [&'static str; 3] = ["vc", "angel", "strategic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vc => "vc",
            Self::Angel => "angel",
            Self::Strategic => "strategic",
        }
    }
}

impl FromStr for InvestorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vc" => Ok(Self::Vc),
            "angel" => Ok(Self::Angel),
            "strategic" => Ok(Self::Strategic),
            other => Err(unknown("investor type", other, &Self::ALL)),
        }
    }
}

impl fmt::Display for InvestorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OutreachKind / OutreachStatus
// ---------------------------------------------------------------------------

/// Channel used for an investor outreach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutreachKind {
    Message,
    Meeting,
    Pitch,
}

impl OutreachKind {
    pub const ALL: [&'static str; 3] = ["message", "meeting", "pitch"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Meeting => "meeting",
            Self::Pitch => "pitch",
        }
    }
}

impl FromStr for OutreachKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Self::Message),
            "meeting" => Ok(Self::Meeting),
            "pitch" => Ok(Self::Pitch),
            other => Err(unknown("outreach type", other, &Self::ALL)),
        }
    }
}

impl fmt::Display for OutreachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investor response to an outreach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutreachStatus {
    #[default]
    Pending,
    Positive,
    Neutral,
    Negative,
}

impl OutreachStatus {
    pub const ALL: [&'static str; 4] = ["pending", "positive", "neutral", "negative"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl FromStr for OutreachStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(unknown("outreach status", other, &Self::ALL)),
        }
    }
}

impl fmt::Display for OutreachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// File kind of an application document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Xls,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xls => "xls",
            Self::Other => "other",
        }
    }

    /// Guess the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Docx,
            "xls" | "xlsx" | "csv" => Self::Xls,
            _ => Self::Other,
        }
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "xls" => Ok(Self::Xls),
            "other" => Ok(Self::Other),
            other => Err(unknown("document type", other, &["pdf", "docx", "xls", "other"])),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Kind of ecosystem event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PitchCompetition,
    Meetup,
    Conference,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PitchCompetition => "pitch-competition",
            Self::Meetup => "meetup",
            Self::Conference => "conference",
        }
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pitch-competition" => Ok(Self::PitchCompetition),
            "meetup" => Ok(Self::Meetup),
            "conference" => Ok(Self::Conference),
            other => Err(unknown(
                "event type",
                other,
                &["pitch-competition", "meetup", "conference"],
            )),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
