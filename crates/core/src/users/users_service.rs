use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use super::password::{hash_password, verify_dummy_password, verify_password};
use super::users_model::{validate_password, validate_username, NewUser, NewUserRecord, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::PASSWORD_HASH_TYPE_ARGON2ID;
use crate::errors::{Error, Result};
use crate::utils::time_utils::now_naive_utc;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Service for managing users
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_username_free(&self, username: &str, except_user_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_username(username)? {
            Some(existing) if Some(existing.id.as_str()) != except_user_id => Err(
                Error::Conflict(format!("Username '{}' is already taken", username)),
            ),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_users(&self) -> Result<Vec<User>> {
        self.repository.list()
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.repository
            .find_by_username(username)?
            .ok_or_else(|| Error::NotFound(format!("User '{username}'")))
    }

    fn count_users(&self) -> Result<i64> {
        self.repository.count()
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        self.ensure_username_free(&new_user.username, None)?;

        let record = NewUserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            username: new_user.username,
            password_hash: hash_password(&new_user.password)?,
            password_hash_type: PASSWORD_HASH_TYPE_ARGON2ID.to_string(),
            is_admin: new_user.is_admin,
            created_at: now_naive_utc(),
        };
        let user = self.repository.create(record).await?;
        info!("Created user '{}' (admin: {})", user.username, user.is_admin);
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(user) = self.repository.find_by_username(username)? else {
            debug!("Login attempt for unknown user '{}'", username);
            verify_dummy_password(password);
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &user.password_hash_type, &user.password_hash)? {
            warn!("Failed login for user '{}'", username);
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if user.is_disabled() {
            return Err(Error::Forbidden("User account is disabled".to_string()));
        }

        Ok(user)
    }

    async fn update_password(&self, user_id: &str, new_password: &str) -> Result<User> {
        validate_password(new_password)?;
        self.repository.get_by_id(user_id)?;
        let hash = hash_password(new_password)?;
        self.repository
            .update_password(user_id, hash, PASSWORD_HASH_TYPE_ARGON2ID.to_string())
            .await
    }

    async fn change_own_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<User> {
        let user = self.repository.get_by_id(user_id)?;
        if !verify_password(current_password, &user.password_hash_type, &user.password_hash)? {
            return Err(Error::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        self.update_password(user_id, new_password).await
    }

    async fn update_username(&self, user_id: &str, username: &str) -> Result<User> {
        validate_username(username)?;
        self.repository.get_by_id(user_id)?;
        self.ensure_username_free(username, Some(user_id))?;
        self.repository
            .update_username(user_id, username.to_string())
            .await
    }

    async fn set_admin(&self, acting_user_id: &str, user_id: &str, is_admin: bool) -> Result<User> {
        if acting_user_id == user_id && !is_admin {
            return Err(Error::Conflict(
                "Administrators cannot revoke their own admin rights".to_string(),
            ));
        }
        self.repository.get_by_id(user_id)?;
        self.repository.set_admin(user_id, is_admin).await
    }

    async fn enable_user(&self, user_id: &str) -> Result<User> {
        let user = self.repository.get_by_id(user_id)?;
        if !user.is_disabled() {
            return Ok(user);
        }
        self.repository.set_disabled(user_id, None).await
    }

    async fn disable_user(&self, acting_user_id: &str, user_id: &str) -> Result<User> {
        if acting_user_id == user_id {
            return Err(Error::Conflict(
                "Users cannot disable their own account".to_string(),
            ));
        }
        let user = self.repository.get_by_id(user_id)?;
        if user.is_disabled() {
            return Ok(user);
        }
        self.repository
            .set_disabled(user_id, Some(now_naive_utc()))
            .await
    }

    async fn delete_user(&self, acting_user_id: &str, user_id: &str) -> Result<()> {
        if acting_user_id == user_id {
            return Err(Error::Conflict(
                "Users cannot delete their own account".to_string(),
            ));
        }
        let deleted = self.repository.delete(user_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("User {user_id}")));
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }
}
