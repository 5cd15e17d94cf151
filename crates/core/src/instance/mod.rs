//! Instance module - file markers, the setup sequence and version updates.

mod instance_model;
mod instance_store;
mod instance_traits;
mod migrators;
mod setup_service;
mod update_service;

#[cfg(test)]
mod instance_service_tests;

pub use instance_model::{
    setup_availability, update_availability, InstanceState, SetupAvailability,
    SetupConfigurationInfo, SetupPreConfiguration, SetupRequest, SetupResult,
    UpdateAvailability, UpdateOutcome,
};
pub use instance_store::{
    read_instance_state, FileInstanceStore, InstanceStore, HOMEBOOK_INSTANCE_MARKER,
    INSTANCE_VERSION_FILE, SETUP_INSTANCE_MARKER,
};
pub use instance_traits::{SchemaMigrator, SetupServiceTrait, UpdateServiceTrait};
pub use migrators::{
    default_migrators, DefaultLocaleMigrator, InstanceCreatedAtMigrator, MigrationContext,
    MigratorRegistry, UpdateMigrator,
};
pub use setup_service::SetupService;
pub use update_service::UpdateService;
