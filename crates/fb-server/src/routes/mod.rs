//! Route handlers for the HTTP API.

pub mod analytics;
pub mod applications;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod events;
pub mod finance;
pub mod health;
pub mod investors;
pub mod opportunities;
pub mod outreach;
pub mod profile;
pub mod root;
pub mod seed;

use std::str::FromStr;

use fb_core::{Error, UserId};

/// Treat a missing, blank, or `all` query value as "no filter".
pub(crate) fn filter_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Parse an optional enum-valued filter; unknown values are a 400.
pub(crate) fn parse_filter<T>(value: Option<&str>) -> fb_core::Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    filter_value(value).map(str::parse).transpose()
}

/// A required, non-blank `userId`.
pub(crate) fn require_user_id(value: Option<&str>) -> fb_core::Result<UserId> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| UserId::from(v.to_string()))
        .ok_or_else(|| Error::validation("userId is required"))
}

/// A required, non-blank string field from a request body.
pub(crate) fn required<'a>(value: &'a Option<String>, field: &str) -> fb_core::Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(format!("{field} is required")))
}

/// Page size from a `limit` query value; negative values are a 400.
pub(crate) fn page_limit(value: Option<i64>, default: i64) -> fb_core::Result<i64> {
    match value {
        Some(n) if n < 0 => Err(Error::validation("limit must not be negative")),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

/// Normalize an optional date field to the stored timestamp form.
pub(crate) fn optional_date(value: Option<&str>) -> fb_core::Result<Option<String>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(fb_core::time::normalize)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::OpportunityKind;

    #[test]
    fn all_means_no_filter() {
        assert_eq!(filter_value(Some("all")), None);
        assert_eq!(filter_value(Some("  ")), None);
        assert_eq!(filter_value(None), None);
        assert_eq!(filter_value(Some("Climate")), Some("Climate"));
    }

    #[test]
    fn enum_filters_parse_or_reject() {
        assert_eq!(
            parse_filter::<OpportunityKind>(Some("grant")).unwrap(),
            Some(OpportunityKind::Grant)
        );
        assert_eq!(parse_filter::<OpportunityKind>(Some("all")).unwrap(), None);
        assert!(parse_filter::<OpportunityKind>(Some("crypto")).is_err());
    }

    #[test]
    fn user_id_is_required() {
        assert!(require_user_id(None).is_err());
        assert!(require_user_id(Some("")).is_err());
        assert_eq!(require_user_id(Some("user_1")).unwrap().as_str(), "user_1");
    }

    #[test]
    fn negative_limits_are_rejected() {
        assert_eq!(page_limit(None, 50).unwrap(), 50);
        assert_eq!(page_limit(Some(0), 50).unwrap(), 0);
        assert_eq!(page_limit(Some(7), 50).unwrap(), 7);
        assert_eq!(page_limit(Some(-1), 50).unwrap_err().http_status(), 400);
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let err = required(&Some("   ".into()), "name").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name is required");
        assert_eq!(required(&Some(" x ".into()), "name").unwrap(), "x");
    }
}
