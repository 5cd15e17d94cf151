//! Instance configuration models.

use serde::{Deserialize, Serialize};

use crate::constants::SUPPORTED_LOCALES;
use crate::{Error, Result};

pub const INSTANCE_NAME_MAX_LEN: usize = 128;

/// A global key/value configuration row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationEntry {
    pub key: String,
    pub value: String,
}

/// Public facts about the instance, shown before login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub name: String,
    pub default_locale: String,
}

pub fn validate_instance_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("Instance name cannot be empty"));
    }
    if trimmed.chars().count() > INSTANCE_NAME_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Instance name cannot exceed {} characters",
            INSTANCE_NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_locale(locale: &str) -> Result<()> {
    if SUPPORTED_LOCALES.contains(&locale) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "Unsupported locale '{}'",
            locale
        )))
    }
}
