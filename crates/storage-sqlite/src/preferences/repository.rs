use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::UserPreferenceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::user_preferences;
use homebook_core::errors::Result;
use homebook_core::preferences::{UserPreference, UserPreferenceRepositoryTrait};

pub struct UserPreferenceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserPreferenceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserPreferenceRepository { pool, writer }
    }
}

#[async_trait]
impl UserPreferenceRepositoryTrait for UserPreferenceRepository {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<UserPreference>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_preferences::table
            .filter(user_preferences::user_id.eq(user_id))
            .select(UserPreferenceDB::as_select())
            .order(user_preferences::key.asc())
            .load::<UserPreferenceDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(UserPreference::from).collect())
    }

    fn get(&self, user_id: &str, key: &str) -> Result<Option<UserPreference>> {
        let mut conn = get_connection(&self.pool)?;
        let row = user_preferences::table
            .find((user_id, key))
            .select(UserPreferenceDB::as_select())
            .first::<UserPreferenceDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(UserPreference::from))
    }

    async fn upsert(&self, preference: UserPreference) -> Result<UserPreference> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserPreference> {
                let row: UserPreferenceDB = preference.into();
                let saved = diesel::insert_into(user_preferences::table)
                    .values(&row)
                    .on_conflict((user_preferences::user_id, user_preferences::key))
                    .do_update()
                    .set(user_preferences::value.eq(&row.value))
                    .returning(UserPreferenceDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(UserPreference::from(saved))
            })
            .await
    }

    async fn delete(&self, user_id: &str, key: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let key = key.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(user_preferences::table.find((user_id, key)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
