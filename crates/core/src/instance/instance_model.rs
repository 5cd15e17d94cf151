//! Instance lifecycle models: availability states and setup input.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::users::User;

/// Whether the initial setup may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupAvailability {
    /// Nothing has been provisioned yet.
    Available,
    /// Provisioned with the running version.
    AlreadyConfigured,
    /// Provisioned with an older version; an update is needed instead.
    UpdateRequired,
    /// Provisioned by a newer version, or a previous setup never finished.
    Conflict,
}

/// Whether an update may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateAvailability {
    NotInstalled,
    UpToDate,
    #[serde(rename_all = "camelCase")]
    UpdateAvailable { from: String, to: String },
    #[serde(rename_all = "camelCase")]
    Downgrade { instance: String, app: String },
}

/// Snapshot of the instance lifecycle, used by the readiness gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceState {
    pub setup_availability: SetupAvailability,
    pub update_availability: UpdateAvailability,
    pub app_version: String,
    pub instance_version: Option<String>,
    /// Provisioned and on the running version.
    pub ready: bool,
}

/// Body of `POST /setup/start`. Missing fields fall back to the
/// pre-configuration supplied by the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub instance_name: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub default_locale: Option<String>,
    pub licenses_accepted: Option<bool>,
}

/// Setup values provided ahead of time, e.g. through `HB_SETUP_*` variables.
#[derive(Debug, Clone, Default)]
pub struct SetupPreConfiguration {
    pub instance_name: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub default_locale: Option<String>,
    pub licenses_accepted: Option<bool>,
}

/// Public view of the pre-configuration. The password itself is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupConfigurationInfo {
    pub instance_name: Option<String>,
    pub admin_username: Option<String>,
    pub has_admin_password: bool,
    pub default_locale: Option<String>,
    pub licenses_accepted: Option<bool>,
}

impl From<&SetupPreConfiguration> for SetupConfigurationInfo {
    fn from(pre: &SetupPreConfiguration) -> Self {
        Self {
            instance_name: pre.instance_name.clone(),
            admin_username: pre.admin_username.clone(),
            has_admin_password: pre.admin_password.is_some(),
            default_locale: pre.default_locale.clone(),
            licenses_accepted: pre.licenses_accepted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResult {
    pub instance_name: String,
    pub default_locale: String,
    pub admin: User,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateOutcome {
    UpToDate,
    #[serde(rename_all = "camelCase")]
    Updated {
        from: String,
        to: String,
        applied_migrators: Vec<String>,
    },
}

pub fn setup_availability(
    homebook_marker: bool,
    setup_marker: bool,
    instance_version: Option<&Version>,
    app_version: &Version,
) -> SetupAvailability {
    match (homebook_marker, instance_version) {
        (true, Some(instance)) if instance == app_version => SetupAvailability::AlreadyConfigured,
        (true, Some(instance)) if instance < app_version => SetupAvailability::UpdateRequired,
        (true, _) => SetupAvailability::Conflict,
        (false, _) if setup_marker => SetupAvailability::Conflict,
        (false, _) => SetupAvailability::Available,
    }
}

pub fn update_availability(
    homebook_marker: bool,
    instance_version: Option<&Version>,
    app_version: &Version,
) -> UpdateAvailability {
    match (homebook_marker, instance_version) {
        (false, _) | (true, None) => UpdateAvailability::NotInstalled,
        (true, Some(instance)) if instance == app_version => UpdateAvailability::UpToDate,
        (true, Some(instance)) if instance < app_version => UpdateAvailability::UpdateAvailable {
            from: instance.to_string(),
            to: app_version.to_string(),
        },
        (true, Some(instance)) => UpdateAvailability::Downgrade {
            instance: instance.to_string(),
            app: app_version.to_string(),
        },
    }
}
