//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Domain model representing a HomeBook user.
///
/// The password hash never leaves the storage and service layers, so it is
/// skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub password_hash_type: String,
    pub is_admin: bool,
    /// Set when the account has been disabled.
    pub disabled: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }
}

/// Input model for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

/// Row handed to the repository once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub password_hash_type: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        ))));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        ))));
    }
    Ok(())
}
