use async_trait::async_trait;

use super::preferences_model::UserPreference;
use crate::errors::Result;

#[async_trait]
pub trait UserPreferenceRepositoryTrait: Send + Sync {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<UserPreference>>;

    fn get(&self, user_id: &str, key: &str) -> Result<Option<UserPreference>>;

    async fn upsert(&self, preference: UserPreference) -> Result<UserPreference>;

    /// Returns the number of deleted rows.
    async fn delete(&self, user_id: &str, key: &str) -> Result<usize>;
}

#[async_trait]
pub trait UserPreferenceServiceTrait: Send + Sync {
    fn get_preferences(&self, user_id: &str) -> Result<Vec<UserPreference>>;

    fn get_preference(&self, user_id: &str, key: &str) -> Result<UserPreference>;

    async fn set_preference(&self, user_id: &str, key: &str, value: &str)
        -> Result<UserPreference>;

    async fn delete_preference(&self, user_id: &str, key: &str) -> Result<()>;
}
