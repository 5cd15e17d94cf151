use async_trait::async_trait;
use std::sync::Arc;

use super::preferences_model::{
    validate_preference_key, validate_preference_value, UserPreference,
};
use super::preferences_traits::{UserPreferenceRepositoryTrait, UserPreferenceServiceTrait};
use crate::errors::{Error, Result};

pub struct UserPreferenceService {
    repository: Arc<dyn UserPreferenceRepositoryTrait>,
}

impl UserPreferenceService {
    pub fn new(repository: Arc<dyn UserPreferenceRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserPreferenceServiceTrait for UserPreferenceService {
    fn get_preferences(&self, user_id: &str) -> Result<Vec<UserPreference>> {
        self.repository.list_for_user(user_id)
    }

    fn get_preference(&self, user_id: &str, key: &str) -> Result<UserPreference> {
        self.repository
            .get(user_id, key)?
            .ok_or_else(|| Error::NotFound(format!("Preference '{}'", key)))
    }

    async fn set_preference(
        &self,
        user_id: &str,
        key: &str,
        value: &str,
    ) -> Result<UserPreference> {
        validate_preference_key(key)?;
        validate_preference_value(value)?;
        self.repository
            .upsert(UserPreference {
                user_id: user_id.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            })
            .await
    }

    async fn delete_preference(&self, user_id: &str, key: &str) -> Result<()> {
        if self.repository.delete(user_id, key).await? == 0 {
            return Err(Error::NotFound(format!("Preference '{}'", key)));
        }
        Ok(())
    }
}
