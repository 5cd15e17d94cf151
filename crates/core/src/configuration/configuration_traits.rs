use async_trait::async_trait;

use super::configuration_model::{ConfigurationEntry, InstanceInfo};
use crate::errors::Result;

/// Repository trait for global configuration rows.
#[async_trait]
pub trait ConfigurationRepositoryTrait: Send + Sync {
    fn get_all(&self) -> Result<Vec<ConfigurationEntry>>;

    /// Returns `None` when the key has never been written.
    fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces a value.
    async fn set_value(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait ConfigurationServiceTrait: Send + Sync {
    fn get_value(&self, key: &str) -> Result<Option<String>>;

    async fn set_value(&self, key: &str, value: &str) -> Result<()>;

    /// Instance name and default locale, falling back to built-in defaults.
    fn get_instance_info(&self) -> Result<InstanceInfo>;

    async fn set_instance_name(&self, name: &str) -> Result<InstanceInfo>;

    async fn set_default_locale(&self, locale: &str) -> Result<InstanceInfo>;
}
