use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use homebook_core::errors::Result;
use homebook_core::users::{NewUserRecord, User, UserRepositoryTrait};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

fn reload(conn: &mut SqliteConnection, user_id: &str) -> Result<User> {
    let user = users::table
        .find(user_id)
        .select(UserDB::as_select())
        .first::<UserDB>(conn)
        .map_err(StorageError::from)?;
    Ok(User::from(user))
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn list(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .select(UserDB::as_select())
            .order(users::username.asc())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        reload(&mut conn, user_id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(User::from))
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    async fn create(&self, record: NewUserRecord) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let row: UserDB = record.into();
                let created = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(created))
            })
            .await
    }

    async fn update_password(
        &self,
        user_id: &str,
        password_hash: String,
        password_hash_type: String,
    ) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(&user_id))
                    .set((
                        users::password_hash.eq(password_hash),
                        users::password_hash_type.eq(password_hash_type),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                reload(conn, &user_id)
            })
            .await
    }

    async fn update_username(&self, user_id: &str, username: String) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(&user_id))
                    .set(users::username.eq(username))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                reload(conn, &user_id)
            })
            .await
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(&user_id))
                    .set(users::is_admin.eq(is_admin))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                reload(conn, &user_id)
            })
            .await
    }

    async fn set_disabled(&self, user_id: &str, disabled: Option<NaiveDateTime>) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(&user_id))
                    .set(users::disabled.eq(disabled))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                reload(conn, &user_id)
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Preferences, goals and recipes go with the user via ON DELETE CASCADE.
                Ok(diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
