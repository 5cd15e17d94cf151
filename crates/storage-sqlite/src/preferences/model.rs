use diesel::prelude::*;

use homebook_core::preferences::UserPreference;

#[derive(Queryable, Insertable, Selectable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::user_preferences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserPreferenceDB {
    pub user_id: String,
    pub key: String,
    pub value: String,
}

impl From<UserPreferenceDB> for UserPreference {
    fn from(db: UserPreferenceDB) -> Self {
        Self {
            user_id: db.user_id,
            key: db.key,
            value: db.value,
        }
    }
}

impl From<UserPreference> for UserPreferenceDB {
    fn from(domain: UserPreference) -> Self {
        Self {
            user_id: domain.user_id,
            key: domain.key,
            value: domain.value,
        }
    }
}
