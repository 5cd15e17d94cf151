use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::configuration_model::{validate_instance_name, validate_locale, InstanceInfo};
use super::configuration_traits::{ConfigurationRepositoryTrait, ConfigurationServiceTrait};
use crate::constants::{
    CONFIG_DEFAULT_LOCALE, CONFIG_INSTANCE_NAME, DEFAULT_INSTANCE_NAME, DEFAULT_LOCALE,
};
use crate::errors::Result;

pub struct ConfigurationService {
    repository: Arc<dyn ConfigurationRepositoryTrait>,
}

impl ConfigurationService {
    pub fn new(repository: Arc<dyn ConfigurationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ConfigurationServiceTrait for ConfigurationService {
    fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.repository.get_value(key)
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.repository.set_value(key, value).await
    }

    fn get_instance_info(&self) -> Result<InstanceInfo> {
        let name = self
            .repository
            .get_value(CONFIG_INSTANCE_NAME)?
            .unwrap_or_else(|| DEFAULT_INSTANCE_NAME.to_string());
        let default_locale = self
            .repository
            .get_value(CONFIG_DEFAULT_LOCALE)?
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        Ok(InstanceInfo {
            name,
            default_locale,
        })
    }

    async fn set_instance_name(&self, name: &str) -> Result<InstanceInfo> {
        validate_instance_name(name)?;
        self.repository
            .set_value(CONFIG_INSTANCE_NAME, name.trim())
            .await?;
        info!("Instance name changed to '{}'", name.trim());
        self.get_instance_info()
    }

    async fn set_default_locale(&self, locale: &str) -> Result<InstanceInfo> {
        validate_locale(locale)?;
        self.repository
            .set_value(CONFIG_DEFAULT_LOCALE, locale)
            .await?;
        self.get_instance_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigurationEntry;
    use crate::Error;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockConfigurationRepository {
        values: Mutex<BTreeMap<String, String>>,
    }

    #[async_trait]
    impl ConfigurationRepositoryTrait for MockConfigurationRepository {
        fn get_all(&self) -> Result<Vec<ConfigurationEntry>> {
            Ok(self
                .values
                .lock()
                .unwrap()
                .iter()
                .map(|(key, value)| ConfigurationEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect())
        }

        fn get_value(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set_value(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_instance_info_defaults_and_updates() {
        let service = ConfigurationService::new(Arc::new(MockConfigurationRepository::default()));

        let info = service.get_instance_info().unwrap();
        assert_eq!(info.name, DEFAULT_INSTANCE_NAME);
        assert_eq!(info.default_locale, DEFAULT_LOCALE);

        let info = service.set_instance_name("  Our Home ").await.unwrap();
        assert_eq!(info.name, "Our Home");

        let info = service.set_default_locale("de-DE").await.unwrap();
        assert_eq!(info.default_locale, "de-DE");
    }

    #[tokio::test]
    async fn test_rejects_invalid_values() {
        let service = ConfigurationService::new(Arc::new(MockConfigurationRepository::default()));

        assert!(matches!(
            service.set_instance_name("   ").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.set_default_locale("xx-XX").await,
            Err(Error::Validation(_))
        ));
    }
}
