use diesel::prelude::*;

use homebook_core::configuration::ConfigurationEntry;

#[derive(Queryable, Insertable, Selectable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::configurations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConfigurationDB {
    pub key: String,
    pub value: String,
}

impl From<ConfigurationDB> for ConfigurationEntry {
    fn from(db: ConfigurationDB) -> Self {
        Self {
            key: db.key,
            value: db.value,
        }
    }
}
