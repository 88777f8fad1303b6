//! Application operations, including the nested documents, history
//! entries, and compliance checklist rows.

use fb_core::{
    time, ApplicationId, ApplicationStatus, ComplianceItemId, DocumentId, DocumentKind, Error,
    HistoryId, OpportunityId, Result, UserId,
};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::models::{
    Application, ApplicationDetail, ApplicationDocument, ComplianceItem, HistoryEntry,
};

const COLS: &str = "id, user_id, opportunity_id, name, source, amount_requested, status, \
     submission_date, deadline, next_action, insights, created_at, updated_at";
const DOC_COLS: &str = "id, application_id, name, type, url, updated_at";
const HISTORY_COLS: &str = "id, application_id, event, at, by";
const COMPLIANCE_COLS: &str = "id, application_id, label, done";

/// Default page size for application listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Fields for a new application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: UserId,
    pub opportunity_id: Option<OpportunityId>,
    pub name: String,
    pub source: String,
    pub amount_requested: i64,
    pub status: ApplicationStatus,
    pub deadline: Option<String>,
    pub next_action: Option<String>,
    pub insights: Option<String>,
    /// `(label, done)` checklist entries.
    pub compliance: Vec<(String, bool)>,
}

/// Insert an application, then its "Application created" history entry,
/// then any compliance items. These are separate statements.
pub fn create_application(conn: &Connection, new: &NewApplication) -> Result<Application> {
    let id = ApplicationId::new();
    let now = time::now();

    conn.execute(
        "INSERT INTO applications
         (id, user_id, opportunity_id, name, source, amount_requested, status,
          submission_date, deadline, next_action, insights, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9, ?10, ?11, ?11)",
        rusqlite::params![
            id.as_str(),
            new.user_id.as_str(),
            new.opportunity_id.as_ref().map(|o| o.as_str()),
            &new.name,
            &new.source,
            new.amount_requested,
            new.status.as_str(),
            &new.deadline,
            &new.next_action,
            &new.insights,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    add_history(conn, &id, "Application created", Some(new.user_id.as_str()))?;

    for (label, done) in &new.compliance {
        add_compliance_item(conn, &id, label, *done)?;
    }

    get_application(conn, &id)?.ok_or_else(|| Error::not_found("application", &id))
}

/// Get an application by ID.
pub fn get_application(conn: &Connection, id: &ApplicationId) -> Result<Option<Application>> {
    let q = format!("SELECT {COLS} FROM applications WHERE id = ?1");
    match conn.query_row(&q, [id.as_str()], Application::from_row) {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get an application with its nested rows.
pub fn get_application_detail(
    conn: &Connection,
    id: &ApplicationId,
) -> Result<Option<ApplicationDetail>> {
    get_application(conn, id)?
        .map(|app| with_details(conn, app))
        .transpose()
}

fn with_details(conn: &Connection, application: Application) -> Result<ApplicationDetail> {
    Ok(ApplicationDetail {
        documents: list_documents(conn, &application.id)?,
        history: list_history(conn, &application.id)?,
        compliance: list_compliance(conn, &application.id)?,
        application,
    })
}

/// List a user's applications, most recently updated first.
pub fn list_applications(
    conn: &Connection,
    user_id: &UserId,
    status: Option<ApplicationStatus>,
    limit: i64,
) -> Result<Vec<Application>> {
    let mut params: Vec<Value> = vec![Value::Text(user_id.to_string())];
    let mut where_sql = "user_id = ?1".to_string();
    if let Some(status) = status {
        params.push(Value::Text(status.as_str().to_string()));
        where_sql.push_str(" AND status = ?2");
    }
    params.push(Value::Integer(limit.max(0)));

    let q = format!(
        "SELECT {COLS} FROM applications WHERE {where_sql}
         ORDER BY updated_at DESC, id ASC LIMIT ?{}",
        params.len()
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), Application::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// [`list_applications`] with nested rows for each application.
pub fn list_application_details(
    conn: &Connection,
    user_id: &UserId,
    status: Option<ApplicationStatus>,
    limit: i64,
) -> Result<Vec<ApplicationDetail>> {
    list_applications(conn, user_id, status, limit)?
        .into_iter()
        .map(|app| with_details(conn, app))
        .collect()
}

/// Partial update for an application.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    pub status: Option<ApplicationStatus>,
    pub next_action: Option<String>,
    pub insights: Option<String>,
    /// Canonical timestamp.
    pub submission_date: Option<String>,
}

/// Apply `update` and touch `updated_at`. A status change also appends a
/// "Status updated to …" history entry. Returns `None` if the application
/// does not exist.
pub fn update_application(
    conn: &Connection,
    id: &ApplicationId,
    update: &ApplicationUpdate,
) -> Result<Option<Application>> {
    let mut sets = vec!["updated_at = ?1".to_string()];
    let mut params: Vec<Value> = vec![Value::Text(time::now())];

    let mut push = |col: &str, value: Value| {
        params.push(value);
        sets.push(format!("{col} = ?{}", params.len()));
    };
    if let Some(status) = update.status {
        push("status", Value::Text(status.as_str().to_string()));
    }
    if let Some(next_action) = &update.next_action {
        push("next_action", Value::Text(next_action.clone()));
    }
    if let Some(insights) = &update.insights {
        push("insights", Value::Text(insights.clone()));
    }
    if let Some(date) = &update.submission_date {
        push("submission_date", Value::Text(date.clone()));
    }

    params.push(Value::Text(id.to_string()));
    let q = format!(
        "UPDATE applications SET {} WHERE id = ?{}",
        sets.join(", "),
        params.len()
    );
    let n = conn
        .execute(&q, rusqlite::params_from_iter(params))
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }

    if let Some(status) = update.status {
        add_history(conn, id, &format!("Status updated to {status}"), None)?;
    }

    get_application(conn, id)
}

/// Delete an application; child rows cascade. Returns true if removed.
pub fn delete_application(conn: &Connection, id: &ApplicationId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM applications WHERE id = ?1", [id.as_str()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

// ---------------------------------------------------------------------------
// Nested rows
// ---------------------------------------------------------------------------

pub fn add_history(
    conn: &Connection,
    application_id: &ApplicationId,
    event: &str,
    by: Option<&str>,
) -> Result<HistoryEntry> {
    let entry = HistoryEntry {
        id: HistoryId::new(),
        application_id: application_id.clone(),
        event: event.to_string(),
        at: time::now(),
        by: by.map(str::to_string),
    };
    conn.execute(
        "INSERT INTO application_history (id, application_id, event, at, by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            entry.id.as_str(),
            application_id.as_str(),
            &entry.event,
            &entry.at,
            &entry.by
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(entry)
}

/// History for an application, newest first.
pub fn list_history(conn: &Connection, application_id: &ApplicationId) -> Result<Vec<HistoryEntry>> {
    let q = format!(
        "SELECT {HISTORY_COLS} FROM application_history WHERE application_id = ?1
         ORDER BY at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([application_id.as_str()], HistoryEntry::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Attach document metadata to an application.
pub fn add_document(
    conn: &Connection,
    application_id: &ApplicationId,
    name: &str,
    kind: DocumentKind,
    url: Option<&str>,
) -> Result<ApplicationDocument> {
    let doc = ApplicationDocument {
        id: DocumentId::new(),
        application_id: application_id.clone(),
        name: name.to_string(),
        kind,
        url: url.map(str::to_string),
        updated_at: time::now(),
    };
    conn.execute(
        "INSERT INTO application_documents (id, application_id, name, type, url, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            doc.id.as_str(),
            application_id.as_str(),
            &doc.name,
            kind.as_str(),
            &doc.url,
            &doc.updated_at
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(doc)
}

pub fn list_documents(
    conn: &Connection,
    application_id: &ApplicationId,
) -> Result<Vec<ApplicationDocument>> {
    let q = format!(
        "SELECT {DOC_COLS} FROM application_documents WHERE application_id = ?1 ORDER BY rowid"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([application_id.as_str()], ApplicationDocument::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

pub fn add_compliance_item(
    conn: &Connection,
    application_id: &ApplicationId,
    label: &str,
    done: bool,
) -> Result<ComplianceItem> {
    let item = ComplianceItem {
        id: ComplianceItemId::new(),
        application_id: application_id.clone(),
        label: label.to_string(),
        done,
    };
    conn.execute(
        "INSERT INTO compliance_items (id, application_id, label, done) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![item.id.as_str(), application_id.as_str(), &item.label, done],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(item)
}

pub fn list_compliance(
    conn: &Connection,
    application_id: &ApplicationId,
) -> Result<Vec<ComplianceItem>> {
    let q = format!(
        "SELECT {COMPLIANCE_COLS} FROM compliance_items WHERE application_id = ?1 ORDER BY rowid"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([application_id.as_str()], ComplianceItem::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Tick or untick a checklist item belonging to `application_id`.
pub fn set_compliance_done(
    conn: &Connection,
    application_id: &ApplicationId,
    item_id: &ComplianceItemId,
    done: bool,
) -> Result<Option<ComplianceItem>> {
    let n = conn
        .execute(
            "UPDATE compliance_items SET done = ?1 WHERE id = ?2 AND application_id = ?3",
            rusqlite::params![done, item_id.as_str(), application_id.as_str()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }
    let q = format!("SELECT {COMPLIANCE_COLS} FROM compliance_items WHERE id = ?1");
    conn.query_row(&q, [item_id.as_str()], ComplianceItem::from_row)
        .map(Some)
        .map_err(|e| Error::database(e.to_string()))
}

// ---------------------------------------------------------------------------
// Metrics inputs
// ---------------------------------------------------------------------------

/// `(status, amount_requested)` for every application a user owns.
pub fn status_amounts(conn: &Connection, user_id: &UserId) -> Result<Vec<(ApplicationStatus, i64)>> {
    let mut stmt = conn
        .prepare("SELECT status, amount_requested FROM applications WHERE user_id = ?1")
        .map_err(|e| Error::database(e.to_string()))?;
    let raw = stmt
        .query_map([user_id.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    raw.into_iter()
        .map(|(status, amount)| Ok((status.parse::<ApplicationStatus>()?, amount)))
        .collect()
}

/// Name of the user's most recently updated application under review.
pub fn latest_under_review(conn: &Connection, user_id: &UserId) -> Result<Option<String>> {
    let result = conn.query_row(
        "SELECT name FROM applications WHERE user_id = ?1 AND status = 'under_review'
         ORDER BY updated_at DESC LIMIT 1",
        [user_id.as_str()],
        |row| row.get(0),
    );
    match result {
        Ok(name) => Ok(Some(name)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{init_memory_pool, DbPool};
    use crate::queries::users;

    fn setup() -> (DbPool, UserId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, "Founder", "founder@example.com", None).unwrap();
        drop(conn);
        (pool, user.id)
    }

    fn new_app(user_id: &UserId, name: &str, status: ApplicationStatus) -> NewApplication {
        NewApplication {
            user_id: user_id.clone(),
            opportunity_id: None,
            name: name.into(),
            source: "Grant".into(),
            amount_requested: 100_000,
            status,
            deadline: None,
            next_action: None,
            insights: None,
            compliance: vec![("Financial statements".into(), true), ("Tax ID".into(), false)],
        }
    }

    #[test]
    fn create_writes_history_and_compliance() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        let app = create_application(&conn, &new_app(&user, "Pilot", ApplicationStatus::Draft)).unwrap();
        assert!(app.id.as_str().starts_with("app_"));

        let detail = get_application_detail(&conn, &app.id).unwrap().unwrap();
        assert_eq!(detail.history.len(), 1);
        assert_eq!(detail.history[0].event, "Application created");
        assert_eq!(detail.history[0].by.as_deref(), Some(user.as_str()));
        assert_eq!(detail.compliance.len(), 2);
        assert!(detail.compliance[0].done);
        assert!(detail.documents.is_empty());
    }

    #[test]
    fn status_filter_and_missing_user() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        create_application(&conn, &new_app(&user, "A", ApplicationStatus::Draft)).unwrap();
        create_application(&conn, &new_app(&user, "B", ApplicationStatus::Approved)).unwrap();

        let all = list_applications(&conn, &user, None, DEFAULT_LIMIT).unwrap();
        assert_eq!(all.len(), 2);
        let approved =
            list_applications(&conn, &user, Some(ApplicationStatus::Approved), DEFAULT_LIMIT).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].name, "B");

        let nobody = UserId::from("user_nobody".to_string());
        assert!(list_applications(&conn, &nobody, None, DEFAULT_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn status_update_appends_history() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        let app = create_application(&conn, &new_app(&user, "A", ApplicationStatus::Draft)).unwrap();

        let updated = update_application(
            &conn,
            &app.id,
            &ApplicationUpdate {
                status: Some(ApplicationStatus::Submitted),
                next_action: Some("Wait for reviewer".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Submitted);
        assert_eq!(updated.next_action.as_deref(), Some("Wait for reviewer"));

        let events: Vec<String> = list_history(&conn, &app.id)
            .unwrap()
            .into_iter()
            .map(|h| h.event)
            .collect();
        assert!(events.contains(&"Status updated to submitted".to_string()));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn update_without_status_adds_no_history() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        let app = create_application(&conn, &new_app(&user, "A", ApplicationStatus::Draft)).unwrap();
        update_application(
            &conn,
            &app.id,
            &ApplicationUpdate {
                insights: Some("Strong fit".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(list_history(&conn, &app.id).unwrap().len(), 1);
    }

    #[test]
    fn update_missing_returns_none() {
        let (pool, _) = setup();
        let conn = pool.get().unwrap();
        let missing = ApplicationId::from("app_missing".to_string());
        let result = update_application(
            &conn,
            &missing,
            &ApplicationUpdate {
                status: Some(ApplicationStatus::Approved),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_cascades() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        let app = create_application(&conn, &new_app(&user, "A", ApplicationStatus::Draft)).unwrap();
        add_document(&conn, &app.id, "deck.pdf", DocumentKind::Pdf, None).unwrap();

        assert!(delete_application(&conn, &app.id).unwrap());
        assert!(get_application(&conn, &app.id).unwrap().is_none());
        assert!(list_documents(&conn, &app.id).unwrap().is_empty());
        assert!(list_history(&conn, &app.id).unwrap().is_empty());
        assert!(!delete_application(&conn, &app.id).unwrap());
    }

    #[test]
    fn compliance_toggle() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        let app = create_application(&conn, &new_app(&user, "A", ApplicationStatus::Draft)).unwrap();
        let items = list_compliance(&conn, &app.id).unwrap();
        let item = set_compliance_done(&conn, &app.id, &items[1].id, true)
            .unwrap()
            .unwrap();
        assert!(item.done);

        let other = ApplicationId::from("app_other".to_string());
        assert!(set_compliance_done(&conn, &other, &items[1].id, false).unwrap().is_none());
    }

    #[test]
    fn metrics_inputs() {
        let (pool, user) = setup();
        let conn = pool.get().unwrap();
        create_application(&conn, &new_app(&user, "Review me", ApplicationStatus::UnderReview)).unwrap();
        create_application(&conn, &new_app(&user, "Won", ApplicationStatus::Approved)).unwrap();

        let rows = status_amounts(&conn, &user).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(latest_under_review(&conn, &user).unwrap().as_deref(), Some("Review me"));
    }
}
