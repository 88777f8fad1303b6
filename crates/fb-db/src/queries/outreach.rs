//! Investor outreach log.

use std::collections::HashMap;

use fb_core::{
    time, Error, InvestorId, OutreachId, OutreachKind, OutreachStatus, Result, UserId,
};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::models::Outreach;

const COLS: &str = "id, user_id, investor_id, type, status, subject, message, notes, \
     scheduled_date, created_at, updated_at";

/// Fields for a new outreach record.
#[derive(Debug, Clone)]
pub struct NewOutreach {
    pub user_id: UserId,
    pub investor_id: InvestorId,
    pub kind: OutreachKind,
    pub status: OutreachStatus,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
}

pub fn create_outreach(conn: &Connection, new: &NewOutreach) -> Result<Outreach> {
    let id = OutreachId::new();
    let now = time::now();

    conn.execute(
        "INSERT INTO user_outreach
         (id, user_id, investor_id, type, status, subject, message, notes, scheduled_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        rusqlite::params![
            id.as_str(),
            new.user_id.as_str(),
            new.investor_id.as_str(),
            new.kind.as_str(),
            new.status.as_str(),
            &new.subject,
            &new.message,
            &new.notes,
            &new.scheduled_date,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_outreach(conn, &id)?.ok_or_else(|| Error::not_found("outreach", &id))
}

pub fn get_outreach(conn: &Connection, id: &OutreachId) -> Result<Option<Outreach>> {
    let q = format!("SELECT {COLS} FROM user_outreach WHERE id = ?1");
    match conn.query_row(&q, [id.as_str()], Outreach::from_row) {
        Ok(o) => Ok(Some(o)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// A user's outreach, newest first, optionally narrowed to one investor or
/// one status.
pub fn list_outreach(
    conn: &Connection,
    user_id: &UserId,
    investor_id: Option<&InvestorId>,
    status: Option<OutreachStatus>,
) -> Result<Vec<Outreach>> {
    let mut params: Vec<Value> = vec![Value::Text(user_id.to_string())];
    let mut where_sql = "user_id = ?1".to_string();
    if let Some(investor_id) = investor_id {
        params.push(Value::Text(investor_id.to_string()));
        where_sql.push_str(&format!(" AND investor_id = ?{}", params.len()));
    }
    if let Some(status) = status {
        params.push(Value::Text(status.as_str().to_string()));
        where_sql.push_str(&format!(" AND status = ?{}", params.len()));
    }

    let q = format!("SELECT {COLS} FROM user_outreach WHERE {where_sql} ORDER BY created_at DESC, id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), Outreach::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Partial update for an outreach record.
#[derive(Debug, Clone, Default)]
pub struct OutreachUpdate {
    pub status: Option<OutreachStatus>,
    pub notes: Option<String>,
    pub scheduled_date: Option<String>,
}

/// Apply `update`; `None` if the record does not exist.
pub fn update_outreach(
    conn: &Connection,
    id: &OutreachId,
    update: &OutreachUpdate,
) -> Result<Option<Outreach>> {
    let n = conn
        .execute(
            "UPDATE user_outreach SET
                status = COALESCE(?1, status),
                notes = COALESCE(?2, notes),
                scheduled_date = COALESCE(?3, scheduled_date),
                updated_at = ?4
             WHERE id = ?5",
            rusqlite::params![
                update.status.map(|s| s.as_str()),
                &update.notes,
                &update.scheduled_date,
                time::now(),
                id.as_str()
            ],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }
    get_outreach(conn, id)
}

/// Response status of every outreach a user has logged.
pub fn statuses(conn: &Connection, user_id: &UserId) -> Result<Vec<OutreachStatus>> {
    let mut stmt = conn
        .prepare("SELECT status FROM user_outreach WHERE user_id = ?1")
        .map_err(|e| Error::database(e.to_string()))?;
    let raw = stmt
        .query_map([user_id.as_str()], |row| row.get::<_, String>(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    raw.iter().map(|s| s.parse()).collect()
}

/// Per-investor outreach counters for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutreachStats {
    /// Most recent outreach, epoch milliseconds.
    pub last_outreach: Option<i64>,
    pub outreach_count: u32,
    pub pending_outreach: u32,
}

pub fn stats_by_investor(
    conn: &Connection,
    user_id: &UserId,
) -> Result<HashMap<InvestorId, OutreachStats>> {
    let mut stmt = conn
        .prepare(
            "SELECT investor_id, MAX(created_at), COUNT(*),
                    SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END)
             FROM user_outreach WHERE user_id = ?1 GROUP BY investor_id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([user_id.as_str()], |row| {
            let last: Option<String> = row.get(1)?;
            Ok((
                InvestorId::from(row.get::<_, String>(0)?),
                OutreachStats {
                    last_outreach: last.as_deref().and_then(time::epoch_millis),
                    outreach_count: row.get(2)?,
                    pending_outreach: row.get(3)?,
                },
            ))
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{init_memory_pool, DbPool};
    use crate::queries::{investors, users};
    use fb_core::InvestorKind;

    fn setup() -> (DbPool, UserId, InvestorId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "O", "o@example.com", None).unwrap();
        let inv = investors::create_investor(
            &conn,
            &investors::NewInvestor {
                name: "Fund".into(),
                kind: InvestorKind::Angel,
                stages: vec![],
                industries: vec![],
                geo: vec![],
                funding_min: 1,
                funding_max: 2,
                portfolio: vec![],
                email: None,
                linkedin: None,
                website: None,
                match_score: 10,
            },
        )
        .unwrap();
        drop(conn);
        (pool, user.id, inv.id)
    }

    fn log(conn: &Connection, user: &UserId, inv: &InvestorId, status: OutreachStatus) -> Outreach {
        create_outreach(
            conn,
            &NewOutreach {
                user_id: user.clone(),
                investor_id: inv.clone(),
                kind: OutreachKind::Message,
                status,
                subject: Some("Intro".into()),
                message: None,
                notes: None,
                scheduled_date: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn create_list_update() {
        let (pool, user, inv) = setup();
        let conn = pool.get().unwrap();
        let o = log(&conn, &user, &inv, OutreachStatus::Pending);
        assert_eq!(o.status, OutreachStatus::Pending);

        let updated = update_outreach(
            &conn,
            &o.id,
            &OutreachUpdate {
                status: Some(OutreachStatus::Positive),
                notes: Some("Wants a demo".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.status, OutreachStatus::Positive);
        assert_eq!(updated.notes.as_deref(), Some("Wants a demo"));
        assert_eq!(updated.subject.as_deref(), Some("Intro"));

        let positives = list_outreach(&conn, &user, None, Some(OutreachStatus::Positive)).unwrap();
        assert_eq!(positives.len(), 1);
        let missing = OutreachId::from("out_missing".to_string());
        assert!(update_outreach(&conn, &missing, &OutreachUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn stats_group_by_investor() {
        let (pool, user, inv) = setup();
        let conn = pool.get().unwrap();
        log(&conn, &user, &inv, OutreachStatus::Pending);
        log(&conn, &user, &inv, OutreachStatus::Neutral);

        let stats = stats_by_investor(&conn, &user).unwrap();
        let s = stats.get(&inv).unwrap();
        assert_eq!(s.outreach_count, 2);
        assert_eq!(s.pending_outreach, 1);
        assert!(s.last_outreach.is_some());

        assert_eq!(statuses(&conn, &user).unwrap().len(), 2);
    }
}
