use async_trait::async_trait;
use log::{error, info};
use semver::Version;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::instance_model::{update_availability, UpdateAvailability, UpdateOutcome};
use super::instance_store::InstanceStore;
use super::instance_traits::{SchemaMigrator, UpdateServiceTrait};
use super::migrators::{MigrationContext, MigratorRegistry};
use crate::errors::{Error, Result};

pub struct UpdateService {
    store: Arc<dyn InstanceStore>,
    schema: Arc<dyn SchemaMigrator>,
    registry: MigratorRegistry,
    context: MigrationContext,
    app_version: Version,
    running: Mutex<()>,
}

impl UpdateService {
    pub fn new(
        store: Arc<dyn InstanceStore>,
        schema: Arc<dyn SchemaMigrator>,
        registry: MigratorRegistry,
        context: MigrationContext,
        app_version: Version,
    ) -> Self {
        Self {
            store,
            schema,
            registry,
            context,
            app_version,
            running: Mutex::new(()),
        }
    }

    async fn run(&self, from: Version) -> Result<UpdateOutcome> {
        info!("Updating instance from {} to {}", from, self.app_version);

        let applied = self
            .schema
            .migrate()
            .await
            .map_err(|e| Error::Instance(format!("Database migration failed: {e}")))?;
        info!("Applied {} database migrations", applied);

        let mut applied_migrators = Vec::new();
        for migrator in self.registry.pending(&from, &self.app_version) {
            info!(
                "Running update migrator {}: {}",
                migrator.version(),
                migrator.description()
            );
            migrator.execute(&self.context).await.map_err(|e| {
                error!("Update migrator {} failed: {}", migrator.version(), e);
                Error::Instance(format!(
                    "Update migrator {} failed: {}",
                    migrator.version(),
                    e
                ))
            })?;
            applied_migrators.push(migrator.version().to_string());
        }

        self.store.write_version(&self.app_version)?;
        info!("Instance updated to {}", self.app_version);

        Ok(UpdateOutcome::Updated {
            from: from.to_string(),
            to: self.app_version.to_string(),
            applied_migrators,
        })
    }
}

#[async_trait]
impl UpdateServiceTrait for UpdateService {
    fn get_availability(&self) -> Result<UpdateAvailability> {
        let homebook_marker = self.store.has_homebook_marker()?;
        let instance_version = self.store.read_version()?;
        Ok(update_availability(
            homebook_marker,
            instance_version.as_ref(),
            &self.app_version,
        ))
    }

    async fn start_update(&self) -> Result<UpdateOutcome> {
        let _running = self.running.lock().await;

        match self.get_availability()? {
            UpdateAvailability::NotInstalled => Err(Error::PreconditionFailed(
                "HomeBook has not been set up yet".to_string(),
            )),
            UpdateAvailability::UpToDate => Ok(UpdateOutcome::UpToDate),
            UpdateAvailability::Downgrade { instance, app } => Err(Error::Conflict(format!(
                "Instance version {instance} is newer than application version {app}"
            ))),
            UpdateAvailability::UpdateAvailable { .. } => {
                let from = self.store.read_version()?.ok_or_else(|| {
                    Error::Instance("Instance version disappeared during update".to_string())
                })?;
                self.run(from).await
            }
        }
    }
}
