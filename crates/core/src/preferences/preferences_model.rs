//! User preference models.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const PREFERENCE_KEY_MAX_LEN: usize = 64;
pub const PREFERENCE_VALUE_MAX_LEN: usize = 4096;

/// A per-user key/value row. (`user_id`, `key`) is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub key: String,
    pub value: String,
}

pub fn validate_preference_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > PREFERENCE_KEY_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Preference key must be between 1 and {} characters",
            PREFERENCE_KEY_MAX_LEN
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
    {
        return Err(Error::invalid_input(
            "Preference key may only contain lowercase letters, digits, '.', '_' and '-'",
        ));
    }
    Ok(())
}

pub fn validate_preference_value(value: &str) -> Result<()> {
    if value.len() > PREFERENCE_VALUE_MAX_LEN {
        return Err(Error::invalid_input(format!(
            "Preference value cannot exceed {} bytes",
            PREFERENCE_VALUE_MAX_LEN
        )));
    }
    Ok(())
}
