use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::ConfigurationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::configurations;
use homebook_core::configuration::{ConfigurationEntry, ConfigurationRepositoryTrait};
use homebook_core::errors::Result;

pub struct ConfigurationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ConfigurationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ConfigurationRepository { pool, writer }
    }
}

#[async_trait]
impl ConfigurationRepositoryTrait for ConfigurationRepository {
    fn get_all(&self) -> Result<Vec<ConfigurationEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = configurations::table
            .select(ConfigurationDB::as_select())
            .order(configurations::key.asc())
            .load::<ConfigurationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ConfigurationEntry::from).collect())
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(configurations::table
            .find(key)
            .select(configurations::value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?)
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let row = ConfigurationDB {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(configurations::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;

    #[tokio::test]
    async fn test_set_value_overwrites() {
        let db = setup_db();
        let repo = ConfigurationRepository::new(db.pool.clone(), db.writer.clone());

        assert_eq!(repo.get_value("instance_name").unwrap(), None);
        repo.set_value("instance_name", "Home").await.unwrap();
        repo.set_value("instance_name", "Cottage").await.unwrap();
        repo.set_value("default_locale", "de-DE").await.unwrap();

        assert_eq!(
            repo.get_value("instance_name").unwrap().as_deref(),
            Some("Cottage")
        );
        let keys: Vec<_> = repo.get_all().unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["default_locale", "instance_name"]);
    }
}
