//! User preferences module - per-user key/value settings.

mod preferences_model;
mod preferences_service;
mod preferences_traits;

pub use preferences_model::{validate_preference_key, validate_preference_value, UserPreference};
pub use preferences_service::UserPreferenceService;
pub use preferences_traits::{UserPreferenceRepositoryTrait, UserPreferenceServiceTrait};
