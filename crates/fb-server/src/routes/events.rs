//! Ecosystem events listing.

use axum::extract::{Query, State};
use axum::Json;
use fb_core::{Error, EventKind};
use fb_db::models::Event;
use fb_db::queries::events::{self, EventFilter};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{filter_value, parse_filter};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEventsParams {
    /// `pitch-competition`, `meetup`, `conference`, or `all`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub industry: Option<String>,
    /// `true` or `false`.
    pub recommended: Option<String>,
}

fn parse_bool(value: Option<&str>) -> fb_core::Result<Option<bool>> {
    match filter_value(value) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(Error::validation(format!(
            "recommended must be true or false, got '{other}'"
        ))),
    }
}

/// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Active events, soonest first", body = Vec<Event>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_events(
    State(ctx): State<AppContext>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<Vec<Event>>, AppError> {
    let filter = EventFilter {
        kind: parse_filter::<EventKind>(params.kind.as_deref())?,
        industry: filter_value(params.industry.as_deref()).map(String::from),
        recommended: parse_bool(params.recommended.as_deref())?,
    };

    let conn = ctx.conn()?;
    Ok(Json(events::list_events(&conn, &filter)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_flag_parsing() {
        assert_eq!(parse_bool(None).unwrap(), None);
        assert_eq!(parse_bool(Some("all")).unwrap(), None);
        assert_eq!(parse_bool(Some("true")).unwrap(), Some(true));
        assert_eq!(parse_bool(Some("false")).unwrap(), Some(false));
        assert!(parse_bool(Some("yes")).is_err());
    }
}
