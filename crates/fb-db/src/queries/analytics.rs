//! Analytics snapshots and client beacons.

use fb_core::{time, BeaconId, Error, Result, SnapshotId, UserId};
use rusqlite::Connection;

use crate::models::{AnalyticsEvent, AnalyticsSnapshot};

const SNAPSHOT_COLS: &str = "id, user_id, date, total_matches, applications_in_progress, \
     success_rate, potential_funding, outreach_count, positive_responses, readiness_score";
const BEACON_COLS: &str = "id, event, entity_id, path, ts, user_agent, referer, received_at";

/// Metric values captured in a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotValues {
    pub total_matches: i64,
    pub applications_in_progress: i64,
    pub success_rate: i64,
    pub potential_funding: i64,
    pub outreach_count: i64,
    pub positive_responses: i64,
    pub readiness_score: i64,
}

/// Store a snapshot dated now.
pub fn create_snapshot(
    conn: &Connection,
    user_id: &UserId,
    values: &SnapshotValues,
) -> Result<AnalyticsSnapshot> {
    let snapshot = AnalyticsSnapshot {
        id: SnapshotId::new(),
        user_id: Some(user_id.clone()),
        date: time::now(),
        total_matches: values.total_matches,
        applications_in_progress: values.applications_in_progress,
        success_rate: values.success_rate,
        potential_funding: values.potential_funding,
        outreach_count: values.outreach_count,
        positive_responses: values.positive_responses,
        readiness_score: values.readiness_score,
    };
    conn.execute(
        &format!(
            "INSERT INTO analytics ({SNAPSHOT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        rusqlite::params![
            snapshot.id.as_str(),
            user_id.as_str(),
            &snapshot.date,
            values.total_matches,
            values.applications_in_progress,
            values.success_rate,
            values.potential_funding,
            values.outreach_count,
            values.positive_responses,
            values.readiness_score,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(snapshot)
}

/// A user's snapshots, newest first.
pub fn list_snapshots(
    conn: &Connection,
    user_id: &UserId,
    limit: i64,
) -> Result<Vec<AnalyticsSnapshot>> {
    let q = format!(
        "SELECT {SNAPSHOT_COLS} FROM analytics WHERE user_id = ?1
         ORDER BY date DESC, rowid DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params![user_id.as_str(), limit.max(0)],
            AnalyticsSnapshot::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// A validated beacon ready to store.
#[derive(Debug, Clone, Default)]
pub struct NewBeacon {
    pub event: String,
    pub entity_id: Option<String>,
    pub path: Option<String>,
    pub ts: Option<i64>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

pub fn record_beacon(conn: &Connection, beacon: &NewBeacon) -> Result<AnalyticsEvent> {
    let event = AnalyticsEvent {
        id: BeaconId::new(),
        event: beacon.event.clone(),
        entity_id: beacon.entity_id.clone(),
        path: beacon.path.clone(),
        ts: beacon.ts,
        user_agent: beacon.user_agent.clone(),
        referer: beacon.referer.clone(),
        received_at: time::now(),
    };
    conn.execute(
        &format!("INSERT INTO analytics_events ({BEACON_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        rusqlite::params![
            event.id.as_str(),
            &event.event,
            &event.entity_id,
            &event.path,
            event.ts,
            &event.user_agent,
            &event.referer,
            &event.received_at,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(event)
}

/// Most recent beacons, newest first.
pub fn recent_beacons(conn: &Connection, limit: i64) -> Result<Vec<AnalyticsEvent>> {
    let q = format!(
        "SELECT {BEACON_COLS} FROM analytics_events ORDER BY received_at DESC, rowid DESC LIMIT ?1"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([limit.max(0)], AnalyticsEvent::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::users;

    #[test]
    fn snapshots_newest_first() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "A", "a@example.com", None).unwrap();

        create_snapshot(&conn, &user.id, &SnapshotValues { readiness_score: 10, ..Default::default() }).unwrap();
        create_snapshot(&conn, &user.id, &SnapshotValues { readiness_score: 20, ..Default::default() }).unwrap();

        let list = list_snapshots(&conn, &user.id, 10).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].readiness_score, 20);
        assert!(list[0].id.as_str().starts_with("analytics_"));

        assert_eq!(list_snapshots(&conn, &user.id, 1).unwrap().len(), 1);
    }

    #[test]
    fn beacons_are_stored() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let stored = record_beacon(
            &conn,
            &NewBeacon {
                event: "opportunity_view".into(),
                entity_id: Some("opp_001".into()),
                path: Some("/opportunities".into()),
                ts: Some(1_700_000_000_000),
                ..Default::default()
            },
        )
        .unwrap();

        let recent = recent_beacons(&conn, 5).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, stored.id);
        assert_eq!(recent[0].ts, Some(1_700_000_000_000));
    }
}
