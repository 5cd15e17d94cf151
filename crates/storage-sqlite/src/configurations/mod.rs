//! SQLite storage implementation for instance configuration.

mod model;
mod repository;

pub use model::ConfigurationDB;
pub use repository::ConfigurationRepository;
