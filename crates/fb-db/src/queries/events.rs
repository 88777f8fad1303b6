//! Ecosystem events.

use fb_core::{Error, EventKind, Result};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::models::Event;

const COLS: &str = "id, title, date, location, type, industries, ai_recommended, image_url, \
     description, website_url, is_active, created_at";

/// Filters for [`list_events`].
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub kind: Option<EventKind>,
    /// Case-insensitive substring of any `industries` entry.
    pub industry: Option<String>,
    pub recommended: Option<bool>,
}

/// Active events, soonest first.
pub fn list_events(conn: &Connection, filter: &EventFilter) -> Result<Vec<Event>> {
    let mut clauses = vec!["is_active = 1".to_string()];
    let mut params: Vec<Value> = Vec::new();
    if let Some(kind) = filter.kind {
        params.push(Value::Text(kind.as_str().to_string()));
        clauses.push(format!("type = ?{}", params.len()));
    }
    if let Some(recommended) = filter.recommended {
        params.push(Value::Integer(i64::from(recommended)));
        clauses.push(format!("ai_recommended = ?{}", params.len()));
    }

    let q = format!(
        "SELECT {COLS} FROM events WHERE {} ORDER BY date ASC, id ASC",
        clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), Event::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    let Some(industry) = filter.industry.as_deref().map(str::to_lowercase) else {
        return Ok(rows);
    };
    Ok(rows
        .into_iter()
        .filter(|e| e.industries.iter().any(|i| i.to_lowercase().contains(&industry)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::seed;

    #[test]
    fn filters_over_seeded_events() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed::seed_demo_data(&conn).unwrap();

        let all = list_events(&conn, &EventFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].date <= w[1].date));

        let meetups = list_events(
            &conn,
            &EventFilter {
                kind: Some(EventKind::Meetup),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(meetups.iter().all(|e| e.kind == EventKind::Meetup));

        let recommended = list_events(
            &conn,
            &EventFilter {
                recommended: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(recommended.iter().all(|e| e.ai_recommended));
        assert!(!recommended.is_empty());
    }
}
