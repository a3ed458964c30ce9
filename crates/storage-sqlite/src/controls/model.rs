use diesel::prelude::*;

/// Database model for control-plane rows.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::system_controls)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SystemControlDB {
    pub control_key: String,
    pub control_value: String,
    pub control_type: String,
    pub updated_at: String,
}
