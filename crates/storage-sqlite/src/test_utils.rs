//! Temp-database fixtures for repository tests.

use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::users::UserRepository;
use homebook_core::users::{NewUserRecord, User, UserRepositoryTrait};

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_path = db_path.to_string_lossy().to_string();

    init(&db_path).expect("Failed to initialise database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn timestamp(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub async fn create_user(db: &TestDb, id: &str, username: &str) -> User {
    UserRepository::new(db.pool.clone(), db.writer.clone())
        .create(NewUserRecord {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            password_hash_type: "argon2id".to_string(),
            is_admin: false,
            created_at: timestamp(1),
        })
        .await
        .expect("Failed to create user")
}
