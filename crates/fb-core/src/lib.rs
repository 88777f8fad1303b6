//! fb-core: shared types, IDs, errors, configuration, and domain calculations.
//!
//! This crate is the foundational dependency for the other fb-* crates. It
//! provides prefixed text identifiers, a unified error type, funding-domain
//! enums, application configuration, and the pure arithmetic behind the
//! dashboard metrics, financial calculators, and the canned assistant.

pub mod assistant;
pub mod config;
pub mod domain;
pub mod error;
pub mod finance;
pub mod ids;
pub mod metrics;
pub mod time;

// Re-export the most commonly used items at the crate root.
pub use domain::*;
pub use error::{Error, Result};
pub use ids::*;
