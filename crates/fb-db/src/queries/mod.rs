//! Database query modules.

pub mod analytics;
pub mod applications;
pub mod events;
pub mod investors;
pub mod opportunities;
pub mod outreach;
pub mod profiles;
pub mod saved;
pub mod sessions;
pub mod users;
