//! SQLite storage implementation for HomeBook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `homebook-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations, applied on demand by setup and update
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `homebook-core` and the server work with traits only.
//!
//! ```text
//! apps/server ──► core (domain, traits)
//!      │                ▲
//!      └──────► storage-sqlite (this crate)
//!                       │
//!                       ▼
//!                   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod configurations;
pub mod preferences;
pub mod recipes;
pub mod saving_goals;
pub mod users;

#[cfg(test)]
mod test_utils;

// Schema migrations for the instance lifecycle
pub mod schema_migrator;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use schema_migrator::SqliteSchemaMigrator;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from homebook-core for convenience
pub use homebook_core::errors::{DatabaseError, Error, Result};
