//! Applies the embedded Diesel migrations on behalf of setup and update.

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::{run_migrations, DbPool};
use homebook_core::errors::{Error, Result};
use homebook_core::instance::SchemaMigrator;

pub struct SqliteSchemaMigrator {
    pool: Arc<DbPool>,
}

impl SqliteSchemaMigrator {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaMigrator for SqliteSchemaMigrator {
    async fn migrate(&self) -> Result<usize> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || run_migrations(&pool))
            .await
            .map_err(|e| Error::Unexpected(format!("Migration task failed: {e}")))?
    }
}
