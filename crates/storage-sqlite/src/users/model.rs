//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use homebook_core::users::{NewUserRecord, User};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub password_hash_type: String,
    pub is_admin: bool,
    pub disabled: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            password_hash: db.password_hash,
            password_hash_type: db.password_hash_type,
            is_admin: db.is_admin,
            disabled: db.disabled,
            created_at: db.created_at,
        }
    }
}

impl From<NewUserRecord> for UserDB {
    fn from(record: NewUserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            password_hash_type: record.password_hash_type,
            is_admin: record.is_admin,
            disabled: None,
            created_at: record.created_at,
        }
    }
}
