//! HomeBook Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for HomeBook: users, instance
//! configuration, saving goals (including the savings calculator), recipes,
//! search and the setup/update sequencer. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod configuration;
pub mod constants;
pub mod errors;
pub mod instance;
pub mod preferences;
pub mod recipes;
pub mod saving_goals;
pub mod search;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
