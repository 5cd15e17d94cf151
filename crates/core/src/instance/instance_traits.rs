use async_trait::async_trait;

use super::instance_model::{
    InstanceState, SetupAvailability, SetupConfigurationInfo, SetupRequest, SetupResult,
    UpdateAvailability, UpdateOutcome,
};
use crate::errors::Result;

/// Brings the database schema up to date. Implemented by the storage layer.
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    /// Applies pending migrations and returns how many ran.
    async fn migrate(&self) -> Result<usize>;
}

#[async_trait]
pub trait SetupServiceTrait: Send + Sync {
    fn get_availability(&self) -> Result<SetupAvailability>;

    fn get_pre_configuration(&self) -> SetupConfigurationInfo;

    fn get_state(&self) -> Result<InstanceState>;

    /// Provisions a fresh instance: migrations, configuration, admin user
    /// and the lifecycle markers.
    async fn start_setup(&self, request: SetupRequest) -> Result<SetupResult>;
}

#[async_trait]
pub trait UpdateServiceTrait: Send + Sync {
    fn get_availability(&self) -> Result<UpdateAvailability>;

    /// Runs pending migrations and update migrators up to the running version.
    async fn start_update(&self) -> Result<UpdateOutcome>;
}
