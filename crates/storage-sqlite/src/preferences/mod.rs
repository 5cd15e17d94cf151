//! SQLite storage implementation for per-user preferences.

mod model;
mod repository;

pub use model::UserPreferenceDB;
pub use repository::UserPreferenceRepository;
