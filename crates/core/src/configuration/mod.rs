//! Configuration module - global key/value settings of the instance.

mod configuration_model;
mod configuration_service;
mod configuration_traits;

pub use configuration_model::{
    validate_instance_name, validate_locale, ConfigurationEntry, InstanceInfo,
};
pub use configuration_service::ConfigurationService;
pub use configuration_traits::{ConfigurationRepositoryTrait, ConfigurationServiceTrait};
