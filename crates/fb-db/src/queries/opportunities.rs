//! Funding opportunity operations.

use fb_core::{time, Error, OpportunityId, OpportunityKind, Result, UserId};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::models::{to_json_list, Opportunity};

pub(crate) const COLS: &str = "id, title, type, industry, location, amount_min, amount_max, \
     currency, deadline, eligibility, description, requirements, process, url, score, \
     is_active, created_at, updated_at";

/// Default page size for opportunity listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Filters for [`list_opportunities`]. Only active rows are ever returned.
#[derive(Debug, Clone)]
pub struct OpportunityFilter {
    pub kind: Option<OpportunityKind>,
    /// Exact industry match.
    pub industry: Option<String>,
    /// Exact location match.
    pub location: Option<String>,
    /// Keep opportunities whose upper bound reaches this amount.
    pub min_amount: Option<i64>,
    /// Keep opportunities whose lower bound does not exceed this amount.
    pub max_amount: Option<i64>,
    /// Canonical timestamp; deadline must be on or before it.
    pub deadline_before: Option<String>,
    /// Case-insensitive substring over title, industry, location,
    /// eligibility, and description.
    pub query: Option<String>,
    /// Restrict to this user's saved set.
    pub saved_by: Option<UserId>,
    pub limit: i64,
}

impl Default for OpportunityFilter {
    fn default() -> Self {
        Self {
            kind: None,
            industry: None,
            location: None,
            min_amount: None,
            max_amount: None,
            deadline_before: None,
            query: None,
            saved_by: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// List active opportunities matching `filter`, best score first.
pub fn list_opportunities(conn: &Connection, filter: &OpportunityFilter) -> Result<Vec<Opportunity>> {
    let mut clauses = vec!["is_active = 1".to_string()];
    let mut params: Vec<Value> = Vec::new();

    if let Some(kind) = filter.kind {
        params.push(Value::Text(kind.as_str().to_string()));
        clauses.push(format!("type = ?{}", params.len()));
    }
    if let Some(industry) = &filter.industry {
        params.push(Value::Text(industry.clone()));
        clauses.push(format!("industry = ?{}", params.len()));
    }
    if let Some(location) = &filter.location {
        params.push(Value::Text(location.clone()));
        clauses.push(format!("location = ?{}", params.len()));
    }
    if let Some(min) = filter.min_amount {
        params.push(Value::Integer(min));
        clauses.push(format!("amount_max >= ?{}", params.len()));
    }
    if let Some(max) = filter.max_amount {
        params.push(Value::Integer(max));
        clauses.push(format!("amount_min <= ?{}", params.len()));
    }
    if let Some(before) = &filter.deadline_before {
        params.push(Value::Text(before.clone()));
        clauses.push(format!("deadline <= ?{}", params.len()));
    }
    if let Some(q) = filter.query.as_deref().filter(|q| !q.is_empty()) {
        params.push(Value::Text(like_pattern(q)));
        let n = params.len();
        let ors = ["title", "industry", "location", "eligibility", "description"]
            .iter()
            .map(|col| format!("{col} LIKE ?{n} ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({ors})"));
    }
    if let Some(user_id) = &filter.saved_by {
        params.push(Value::Text(user_id.to_string()));
        clauses.push(format!(
            "id IN (SELECT opportunity_id FROM user_saved_opportunities WHERE user_id = ?{})",
            params.len()
        ));
    }

    params.push(Value::Integer(filter.limit.max(0)));
    let q = format!(
        "SELECT {COLS} FROM funding_opportunities WHERE {} ORDER BY score DESC, id ASC LIMIT ?{}",
        clauses.join(" AND "),
        params.len()
    );

    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), Opportunity::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Get an opportunity by ID, active or not.
pub fn get_opportunity(conn: &Connection, id: &OpportunityId) -> Result<Option<Opportunity>> {
    let q = format!("SELECT {COLS} FROM funding_opportunities WHERE id = ?1");
    match conn.query_row(&q, [id.as_str()], Opportunity::from_row) {
        Ok(o) => Ok(Some(o)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Fields for a new opportunity.
#[derive(Debug, Clone)]
pub struct NewOpportunity {
    pub title: String,
    pub kind: OpportunityKind,
    pub industry: String,
    pub location: String,
    pub amount_min: i64,
    pub amount_max: i64,
    pub currency: String,
    /// Canonical timestamp.
    pub deadline: String,
    pub eligibility: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub process: Vec<String>,
    pub url: Option<String>,
    pub score: i64,
}

/// Insert an active opportunity and return the stored row.
pub fn create_opportunity(conn: &Connection, new: &NewOpportunity) -> Result<Opportunity> {
    let id = OpportunityId::new();
    let now = time::now();

    conn.execute(
        "INSERT INTO funding_opportunities
         (id, title, type, industry, location, amount_min, amount_max, currency, deadline,
          eligibility, description, requirements, process, url, score, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 1, ?16, ?16)",
        rusqlite::params![
            id.as_str(),
            &new.title,
            new.kind.as_str(),
            &new.industry,
            &new.location,
            new.amount_min,
            new.amount_max,
            &new.currency,
            &new.deadline,
            &new.eligibility,
            &new.description,
            to_json_list(&new.requirements),
            to_json_list(&new.process),
            &new.url,
            new.score,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_opportunity(conn, &id)?.ok_or_else(|| Error::not_found("opportunity", &id))
}
