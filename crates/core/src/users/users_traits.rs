//! User repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::users_model::{NewUser, NewUserRecord, User};
use crate::errors::Result;

/// Persistence contract for users.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Lists all users ordered by username.
    fn list(&self) -> Result<Vec<User>>;

    /// Retrieves a user by ID. Missing users surface as `DatabaseError::NotFound`.
    fn get_by_id(&self, user_id: &str) -> Result<User>;

    fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    fn count(&self) -> Result<i64>;

    async fn create(&self, record: NewUserRecord) -> Result<User>;

    async fn update_password(
        &self,
        user_id: &str,
        password_hash: String,
        password_hash_type: String,
    ) -> Result<User>;

    async fn update_username(&self, user_id: &str, username: String) -> Result<User>;

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<User>;

    /// `Some(timestamp)` disables the user, `None` enables it again.
    async fn set_disabled(&self, user_id: &str, disabled: Option<NaiveDateTime>) -> Result<User>;

    /// Deletes the user together with its preferences, goals and recipes.
    ///
    /// Returns the number of deleted user rows.
    async fn delete(&self, user_id: &str) -> Result<usize>;
}

/// Business operations on users.
///
/// Operations that take an `acting_user_id` refuse to let an administrator
/// lock themselves out (revoke own admin flag, disable or delete themselves).
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_users(&self) -> Result<Vec<User>>;

    fn get_user(&self, user_id: &str) -> Result<User>;

    fn get_user_by_username(&self, username: &str) -> Result<User>;

    fn count_users(&self) -> Result<i64>;

    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// Verifies credentials and returns the matching, enabled user.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User>;

    async fn update_password(&self, user_id: &str, new_password: &str) -> Result<User>;

    async fn change_own_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<User>;

    async fn update_username(&self, user_id: &str, username: &str) -> Result<User>;

    async fn set_admin(&self, acting_user_id: &str, user_id: &str, is_admin: bool) -> Result<User>;

    async fn enable_user(&self, user_id: &str) -> Result<User>;

    async fn disable_user(&self, acting_user_id: &str, user_id: &str) -> Result<User>;

    async fn delete_user(&self, acting_user_id: &str, user_id: &str) -> Result<()>;
}
