//! Version-tagged one-time upgrade steps.

use async_trait::async_trait;
use log::info;
use semver::Version;
use std::collections::HashSet;
use std::sync::Arc;

use crate::configuration::ConfigurationServiceTrait;
use crate::constants::{CONFIG_DEFAULT_LOCALE, CONFIG_INSTANCE_CREATED_AT, DEFAULT_LOCALE};
use crate::utils::time_utils::now_naive_utc;
use crate::{Error, Result};

/// Services available to update migrators.
#[derive(Clone)]
pub struct MigrationContext {
    pub configuration: Arc<dyn ConfigurationServiceTrait>,
}

#[async_trait]
pub trait UpdateMigrator: Send + Sync {
    /// Application version that introduced this migrator.
    fn version(&self) -> Version;

    fn description(&self) -> &'static str;

    async fn execute(&self, ctx: &MigrationContext) -> Result<()>;
}

/// Migrators ordered by ascending version.
#[derive(Clone)]
pub struct MigratorRegistry {
    migrators: Vec<Arc<dyn UpdateMigrator>>,
}

impl MigratorRegistry {
    /// Fails when two migrators share a version.
    pub fn new(mut migrators: Vec<Arc<dyn UpdateMigrator>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for migrator in &migrators {
            if !seen.insert(migrator.version()) {
                return Err(Error::Instance(format!(
                    "Duplicate update migrator for version {}",
                    migrator.version()
                )));
            }
        }
        migrators.sort_by_key(|m| m.version());
        Ok(Self { migrators })
    }

    pub fn versions(&self) -> Vec<Version> {
        self.migrators.iter().map(|m| m.version()).collect()
    }

    /// Migrators with `from < version <= to`, in execution order.
    pub fn pending(&self, from: &Version, to: &Version) -> Vec<Arc<dyn UpdateMigrator>> {
        self.migrators
            .iter()
            .filter(|m| {
                let version = m.version();
                &version > from && &version <= to
            })
            .cloned()
            .collect()
    }
}

/// Seeds the default locale for instances set up before it was configurable.
pub struct DefaultLocaleMigrator;

#[async_trait]
impl UpdateMigrator for DefaultLocaleMigrator {
    fn version(&self) -> Version {
        Version::new(1, 1, 0)
    }

    fn description(&self) -> &'static str {
        "Seed the default locale"
    }

    async fn execute(&self, ctx: &MigrationContext) -> Result<()> {
        if ctx.configuration.get_value(CONFIG_DEFAULT_LOCALE)?.is_none() {
            ctx.configuration
                .set_value(CONFIG_DEFAULT_LOCALE, DEFAULT_LOCALE)
                .await?;
            info!("Seeded default locale '{}'", DEFAULT_LOCALE);
        }
        Ok(())
    }
}

/// Records a creation timestamp for instances that predate it.
pub struct InstanceCreatedAtMigrator;

#[async_trait]
impl UpdateMigrator for InstanceCreatedAtMigrator {
    fn version(&self) -> Version {
        Version::new(1, 2, 0)
    }

    fn description(&self) -> &'static str {
        "Record the instance creation timestamp"
    }

    async fn execute(&self, ctx: &MigrationContext) -> Result<()> {
        if ctx
            .configuration
            .get_value(CONFIG_INSTANCE_CREATED_AT)?
            .is_none()
        {
            let now = now_naive_utc().and_utc().to_rfc3339();
            ctx.configuration
                .set_value(CONFIG_INSTANCE_CREATED_AT, &now)
                .await?;
        }
        Ok(())
    }
}

pub fn default_migrators() -> Vec<Arc<dyn UpdateMigrator>> {
    vec![
        Arc::new(DefaultLocaleMigrator),
        Arc::new(InstanceCreatedAtMigrator),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop(Version);

    #[async_trait]
    impl UpdateMigrator for Noop {
        fn version(&self) -> Version {
            self.0.clone()
        }

        fn description(&self) -> &'static str {
            "noop"
        }

        async fn execute(&self, _ctx: &MigrationContext) -> Result<()> {
            Ok(())
        }
    }

    fn noop(version: &str) -> Arc<dyn UpdateMigrator> {
        Arc::new(Noop(Version::parse(version).unwrap()))
    }

    #[test]
    fn test_registry_sorts_by_version() {
        let registry =
            MigratorRegistry::new(vec![noop("1.10.0"), noop("1.2.0"), noop("1.9.1")]).unwrap();
        let versions: Vec<String> = registry.versions().iter().map(|v| v.to_string()).collect();
        assert_eq!(versions, vec!["1.2.0", "1.9.1", "1.10.0"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        assert!(MigratorRegistry::new(vec![noop("1.1.0"), noop("1.1.0")]).is_err());
    }

    #[test]
    fn test_pending_range_is_exclusive_inclusive() {
        let registry =
            MigratorRegistry::new(vec![noop("1.0.0"), noop("1.1.0"), noop("1.2.0"), noop("1.3.0")])
                .unwrap();
        let pending: Vec<String> = registry
            .pending(&Version::new(1, 0, 0), &Version::new(1, 2, 0))
            .iter()
            .map(|m| m.version().to_string())
            .collect();
        assert_eq!(pending, vec!["1.1.0", "1.2.0"]);
    }

    #[test]
    fn test_default_migrators_are_valid() {
        let registry = MigratorRegistry::new(default_migrators()).unwrap();
        assert_eq!(
            registry.versions(),
            vec![Version::new(1, 1, 0), Version::new(1, 2, 0)]
        );
    }
}
