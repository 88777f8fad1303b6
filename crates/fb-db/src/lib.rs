//! fb-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, query modules for every fundboard
//! table, and the demo-data seeder.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod seed;
