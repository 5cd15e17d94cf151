//! Password hashing with argon2id PHC strings.

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use rand::rngs::OsRng;
use std::sync::OnceLock;

use crate::constants::PASSWORD_HASH_TYPE_ARGON2ID;
use crate::{Error, Result};

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(format!("Failed to hash password: {e}")))
}

/// Returns `Ok(false)` for a wrong password and an error when the stored hash
/// cannot be used at all.
pub fn verify_password(password: &str, hash_type: &str, stored_hash: &str) -> Result<bool> {
    if hash_type != PASSWORD_HASH_TYPE_ARGON2ID {
        return Err(Error::Unexpected(format!(
            "Unsupported password hash type '{hash_type}'"
        )));
    }
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::Unexpected(format!("Invalid stored password hash: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(other) => Err(Error::Unexpected(format!(
            "Password verification failed: {other}"
        ))),
    }
}

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Verifies `password` against a throwaway hash and discards the outcome, so
/// a login for an unknown user costs as much as one with a wrong password.
pub fn verify_dummy_password(password: &str) {
    let hash = DUMMY_HASH.get_or_init(|| hash_password("homebook-unknown-user").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, PASSWORD_HASH_TYPE_ARGON2ID, hash);
    }
}
