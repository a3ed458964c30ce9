use diesel::prelude::*;

use marketpulse_core::instruments::Instrument;

/// Database model for tracked instruments.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstrumentDB {
    pub id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub is_active: bool,
}

impl From<InstrumentDB> for Instrument {
    fn from(db: InstrumentDB) -> Self {
        Instrument {
            id: db.id,
            symbol: db.symbol,
            name: db.name,
            is_active: db.is_active,
        }
    }
}
