use async_trait::async_trait;
use log::{error, info, warn};
use semver::Version;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::instance_model::{
    InstanceState, SetupAvailability, SetupConfigurationInfo, SetupPreConfiguration,
    SetupRequest, SetupResult,
};
use super::instance_store::{read_instance_state, InstanceStore};
use super::instance_traits::{SchemaMigrator, SetupServiceTrait};
use crate::configuration::{validate_instance_name, validate_locale, ConfigurationServiceTrait};
use crate::constants::{CONFIG_INSTANCE_CREATED_AT, DEFAULT_INSTANCE_NAME, DEFAULT_LOCALE};
use crate::errors::{Error, Result, ValidationError};
use crate::users::{validate_password, validate_username, NewUser, User, UserServiceTrait};
use crate::utils::time_utils::now_naive_utc;

/// Setup input after merging the request with the pre-configuration.
struct ResolvedSetup {
    instance_name: String,
    admin_username: String,
    admin_password: String,
    default_locale: String,
    licenses_accepted: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn missing(field: &str) -> Error {
    Error::Validation(ValidationError::MissingField(field.to_string()))
}

pub struct SetupService {
    store: Arc<dyn InstanceStore>,
    schema: Arc<dyn SchemaMigrator>,
    configuration: Arc<dyn ConfigurationServiceTrait>,
    users: Arc<dyn UserServiceTrait>,
    app_version: Version,
    pre_configuration: SetupPreConfiguration,
    // Setup runs to completion; concurrent requests queue here and then
    // observe the new availability.
    running: Mutex<()>,
}

impl SetupService {
    pub fn new(
        store: Arc<dyn InstanceStore>,
        schema: Arc<dyn SchemaMigrator>,
        configuration: Arc<dyn ConfigurationServiceTrait>,
        users: Arc<dyn UserServiceTrait>,
        app_version: Version,
        pre_configuration: SetupPreConfiguration,
    ) -> Self {
        Self {
            store,
            schema,
            configuration,
            users,
            app_version,
            pre_configuration,
            running: Mutex::new(()),
        }
    }

    fn resolve(&self, request: SetupRequest) -> Result<ResolvedSetup> {
        let pre = &self.pre_configuration;

        let instance_name = non_blank(request.instance_name.or_else(|| pre.instance_name.clone()))
            .unwrap_or_else(|| DEFAULT_INSTANCE_NAME.to_string());
        validate_instance_name(&instance_name)?;

        let admin_username =
            non_blank(request.admin_username.or_else(|| pre.admin_username.clone()))
                .ok_or_else(|| missing("adminUsername"))?;
        validate_username(&admin_username)?;

        let admin_password = request
            .admin_password
            .or_else(|| pre.admin_password.clone())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| missing("adminPassword"))?;
        validate_password(&admin_password)?;

        let default_locale =
            non_blank(request.default_locale.or_else(|| pre.default_locale.clone()))
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        validate_locale(&default_locale)?;

        Ok(ResolvedSetup {
            instance_name,
            admin_username,
            admin_password,
            default_locale,
            licenses_accepted: request
                .licenses_accepted
                .or(pre.licenses_accepted)
                .unwrap_or(false),
        })
    }

    /// Steps that run once the setup marker is in place.
    async fn provision(&self, setup: &ResolvedSetup) -> Result<SetupResult> {
        let applied = self.schema.migrate().await?;
        info!("Applied {} database migrations", applied);

        let info = self
            .configuration
            .set_instance_name(&setup.instance_name)
            .await?;
        let info_with_locale = self
            .configuration
            .set_default_locale(&setup.default_locale)
            .await?;
        self.configuration
            .set_value(
                CONFIG_INSTANCE_CREATED_AT,
                &now_naive_utc().and_utc().to_rfc3339(),
            )
            .await?;

        let admin = self.ensure_admin(setup).await?;

        self.store.write_version(&self.app_version)?;
        self.store.write_homebook_marker()?;

        Ok(SetupResult {
            instance_name: info.name,
            default_locale: info_with_locale.default_locale,
            admin,
            version: self.app_version.to_string(),
        })
    }

    /// Creates the administrator, or promotes a leftover account of the same
    /// name from an interrupted setup.
    async fn ensure_admin(&self, setup: &ResolvedSetup) -> Result<User> {
        match self.users.get_user_by_username(&setup.admin_username) {
            Ok(existing) => {
                warn!(
                    "User '{}' already exists, promoting it to administrator",
                    existing.username
                );
                self.users
                    .update_password(&existing.id, &setup.admin_password)
                    .await?;
                self.users.set_admin(&existing.id, &existing.id, true).await
            }
            Err(e) if e.is_not_found() => {
                self.users
                    .create_user(NewUser {
                        username: setup.admin_username.clone(),
                        password: setup.admin_password.clone(),
                        is_admin: true,
                    })
                    .await
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SetupServiceTrait for SetupService {
    fn get_availability(&self) -> Result<SetupAvailability> {
        Ok(self.get_state()?.setup_availability)
    }

    fn get_pre_configuration(&self) -> SetupConfigurationInfo {
        SetupConfigurationInfo::from(&self.pre_configuration)
    }

    fn get_state(&self) -> Result<InstanceState> {
        read_instance_state(self.store.as_ref(), &self.app_version)
    }

    async fn start_setup(&self, request: SetupRequest) -> Result<SetupResult> {
        let _running = self.running.lock().await;

        let availability = self.get_availability()?;
        if availability != SetupAvailability::Available {
            return Err(Error::Conflict(format!(
                "Setup is not available (state: {:?})",
                availability
            )));
        }

        let setup = self.resolve(request)?;
        if !setup.licenses_accepted {
            return Err(Error::PreconditionFailed(
                "The licenses must be accepted before setup can start".to_string(),
            ));
        }

        info!(
            "Starting setup of instance '{}' (version {})",
            setup.instance_name, self.app_version
        );
        self.store.write_setup_marker()?;

        match self.provision(&setup).await {
            Ok(result) => {
                info!("Setup finished, instance is ready");
                Ok(result)
            }
            Err(e) => {
                error!("Setup failed: {}", e);
                if let Err(cleanup) = self.store.remove_setup_marker() {
                    warn!("Failed to remove setup marker after error: {}", cleanup);
                }
                Err(Error::Instance(format!("Setup failed: {e}")))
            }
        }
    }
}
