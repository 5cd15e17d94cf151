//! SQLite storage implementation for saving goals.

mod model;
mod repository;

pub use model::SavingGoalDB;
pub use repository::SavingGoalRepository;
