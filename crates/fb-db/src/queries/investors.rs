//! Investor operations.
//!
//! Scalar filters run in SQL. Stage, geography, and industry live in JSON
//! array columns, so those filters run in Rust over the whole active set
//! before the result is truncated to the requested limit.

use fb_core::{time, Error, InvestorId, InvestorKind, Result};
use rusqlite::types::Value;
use rusqlite::Connection;

use super::opportunities::like_pattern;
use crate::models::{to_json_list, Investor};

const COLS: &str = "id, name, type, stages, industries, geo, funding_min, funding_max, \
     portfolio, email, linkedin, website, match_score, is_active, created_at, updated_at";

/// Default page size for investor listings.
pub const DEFAULT_LIMIT: usize = 50;

/// Filters for [`list_investors`]. Only active investors are returned.
#[derive(Debug, Clone)]
pub struct InvestorFilter {
    pub kind: Option<InvestorKind>,
    /// Case-insensitive substring over name and email.
    pub query: Option<String>,
    /// Exact member of `stages`.
    pub stage: Option<String>,
    /// Exact member of `geo`.
    pub geo: Option<String>,
    /// Case-insensitive substring of any `industries` entry.
    pub industry: Option<String>,
    pub limit: usize,
}

impl Default for InvestorFilter {
    fn default() -> Self {
        Self {
            kind: None,
            query: None,
            stage: None,
            geo: None,
            industry: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl InvestorFilter {
    /// Whether `investor` passes the array filters.
    pub fn matches(&self, investor: &Investor) -> bool {
        if let Some(stage) = &self.stage {
            if !investor.stages.iter().any(|s| s == stage) {
                return false;
            }
        }
        if let Some(geo) = &self.geo {
            if !investor.geo.iter().any(|g| g == geo) {
                return false;
            }
        }
        if let Some(industry) = &self.industry {
            let needle = industry.to_lowercase();
            if !investor
                .industries
                .iter()
                .any(|i| i.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

/// List active investors matching `filter`, best match first.
pub fn list_investors(conn: &Connection, filter: &InvestorFilter) -> Result<Vec<Investor>> {
    let mut clauses = vec!["is_active = 1".to_string()];
    let mut params: Vec<Value> = Vec::new();

    if let Some(kind) = filter.kind {
        params.push(Value::Text(kind.as_str().to_string()));
        clauses.push(format!("type = ?{}", params.len()));
    }
    if let Some(q) = filter.query.as_deref().filter(|q| !q.is_empty()) {
        params.push(Value::Text(like_pattern(q)));
        let n = params.len();
        clauses.push(format!(
            "(name LIKE ?{n} ESCAPE '\\' OR email LIKE ?{n} ESCAPE '\\')"
        ));
    }

    let q = format!(
        "SELECT {COLS} FROM investors WHERE {} ORDER BY match_score DESC, id ASC",
        clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), Investor::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows
        .into_iter()
        .filter(|inv| filter.matches(inv))
        .take(filter.limit)
        .collect())
}

pub fn get_investor(conn: &Connection, id: &InvestorId) -> Result<Option<Investor>> {
    let q = format!("SELECT {COLS} FROM investors WHERE id = ?1");
    match conn.query_row(&q, [id.as_str()], Investor::from_row) {
        Ok(i) => Ok(Some(i)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Fields for a new investor.
#[derive(Debug, Clone)]
pub struct NewInvestor {
    pub name: String,
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
}

/// Insert an active investor and return the stored row.
pub fn create_investor(conn: &Connection, new: &NewInvestor) -> Result<Investor> {
    let id = InvestorId::new();
    let now = time::now();

    conn.execute(
        "INSERT INTO investors
         (id, name, type, stages, industries, geo, funding_min, funding_max, portfolio,
          email, linkedin, website, match_score, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1, ?14, ?14)",
        rusqlite::params![
            id.as_str(),
            &new.name,
            new.kind.as_str(),
            to_json_list(&new.stages),
            to_json_list(&new.industries),
            to_json_list(&new.geo),
            new.funding_min,
            new.funding_max,
            to_json_list(&new.portfolio),
            &new.email,
            &new.linkedin,
            &new.website,
            new.match_score,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_investor(conn, &id)?.ok_or_else(|| Error::not_found("investor", &id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{init_memory_pool, DbPool};

    fn investor(name: &str, stages: &[&str], industries: &[&str], geo: &[&str], score: i64) -> NewInvestor {
        let list = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        NewInvestor {
            name: name.into(),
            kind: InvestorKind::Vc,
            stages: list(stages),
            industries: list(industries),
            geo: list(geo),
            funding_min: 100_000,
            funding_max: 1_000_000,
            portfolio: vec![],
            email: Some(format!("{}@fund.example", name.to_lowercase().replace(' ', ""))),
            linkedin: None,
            website: None,
            match_score: score,
        }
    }

    fn seeded() -> DbPool {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_investor(&conn, &investor("Alpha", &["seed"], &["AI/ML", "SaaS"], &["na"], 90)).unwrap();
        create_investor(&conn, &investor("Beta", &["series-a"], &["FinTech"], &["eu"], 80)).unwrap();
        for i in 0..5 {
            create_investor(&conn, &investor(&format!("Filler {i}"), &["growth"], &["Retail"], &["asia"], 95)).unwrap();
        }
        drop(conn);
        pool
    }

    #[test]
    fn array_filters_see_past_higher_scored_rows() {
        let pool = seeded();
        let conn = pool.get().unwrap();
        // Five higher-scored fillers would crowd out a 2x-limit prefetch.
        let hits = list_investors(
            &conn,
            &InvestorFilter {
                stage: Some("series-a".into()),
                limit: 1,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Beta");
    }

    #[test]
    fn industry_is_substring_and_case_insensitive() {
        let pool = seeded();
        let conn = pool.get().unwrap();
        let hits = list_investors(
            &conn,
            &InvestorFilter {
                industry: Some("ai/".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Alpha");
    }

    #[test]
    fn geo_is_exact_membership() {
        let pool = seeded();
        let conn = pool.get().unwrap();
        let partial = list_investors(
            &conn,
            &InvestorFilter {
                geo: Some("e".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(partial.is_empty());
    }

    #[test]
    fn text_query_and_order() {
        let pool = seeded();
        let conn = pool.get().unwrap();
        let all = list_investors(&conn, &InvestorFilter::default()).unwrap();
        assert_eq!(all.len(), 7);
        assert!(all.windows(2).all(|w| w[0].match_score >= w[1].match_score));

        let beta = list_investors(
            &conn,
            &InvestorFilter {
                query: Some("BETA@".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(beta.len(), 1);
    }

    #[test]
    fn filter_matches_directly() {
        let pool = seeded();
        let conn = pool.get().unwrap();
        let alpha = &list_investors(&conn, &InvestorFilter::default()).unwrap()[5];
        assert_eq!(alpha.name, "Alpha");
        let f = InvestorFilter {
            stage: Some("seed".into()),
            geo: Some("na".into()),
            industry: Some("saas".into()),
            ..Default::default()
        };
        assert!(f.matches(alpha));
    }
}
