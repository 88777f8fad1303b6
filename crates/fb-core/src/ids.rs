//! Typed ID wrappers providing compile-time safety for entity identifiers.
//!
//! Each ID type is a newtype over a prefixed text key such as
//! `opp_3f2a…` or `app_001`. Generated keys use the entity prefix followed by
//! a v4 UUID in simple form; fixture rows keep their short hand-written keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Generate a newtype ID wrapper over `String` with a fixed prefix.
///
/// The macro produces a struct with:
/// - `new()` to create a random prefixed key
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` (empty or whitespace-only keys are rejected)
/// - `From<String>` for values read back from the database
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident => $prefix:literal),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                /// Key prefix for generated IDs.
                pub const PREFIX: &'static str = $prefix;

                /// Create a new random ID.
                #[must_use]
                pub fn new() -> Self {
                    Self(format!("{}_{}", $prefix, Uuid::new_v4().simple()))
                }

                /// Borrow the raw key.
                #[must_use]
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    let s = s.trim();
                    if s.is_empty() {
                        return Err(Error::Validation(format!(
                            "{} must not be empty",
                            stringify!($name)
                        )));
                    }
                    Ok(Self(s.to_string()))
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }

            impl From<$name> for String {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Unique identifier for a registered user.
    UserId => "user",
    /// Unique identifier for a login session.
    SessionId => "sess",
    /// Unique identifier for a funding opportunity.
    OpportunityId => "opp",
    /// Unique identifier for a saved-opportunity bookmark.
    SavedOpportunityId => "saved",
    /// Unique identifier for a funding application.
    ApplicationId => "app",
    /// Unique identifier for an application document.
    DocumentId => "doc",
    /// Unique identifier for an application history entry.
    HistoryId => "hist",
    /// Unique identifier for a compliance checklist item.
    ComplianceItemId => "comp",
    /// Unique identifier for an investor.
    InvestorId => "inv",
    /// Unique identifier for an outreach record.
    OutreachId => "out",
    /// Unique identifier for a startup profile.
    ProfileId => "profile",
    /// Unique identifier for an ecosystem event.
    EventId => "evt",
    /// Unique identifier for a stored analytics snapshot.
    SnapshotId => "analytics",
    /// Unique identifier for a received analytics beacon.
    BeaconId => "ae",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = OpportunityId::new();
        let b = OpportunityId::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("opp_"));
        assert_eq!(a.as_str().len(), "opp_".len() + 32);
    }

    #[test]
    fn fixture_keys_parse() {
        let id: ApplicationId = "app_001".parse().unwrap();
        assert_eq!(id.as_str(), "app_001");
        assert_eq!(id.to_string(), "app_001");
    }

    #[test]
    fn empty_key_rejected() {
        assert!(InvestorId::from_str("").is_err());
        assert!(InvestorId::from_str("   ").is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let id = ProfileId::from("profile_001".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""profile_001""#);
        let back: ProfileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn hash_set_usage() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = UserId::new();
        set.insert(id.clone());
        assert!(set.contains(&id));
    }
}
