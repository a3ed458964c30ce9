use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use marketpulse_core::indices::IndexLevel;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for index levels.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::index_levels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IndexLevelDB {
    pub index_code: String,
    pub index_name: String,
    pub date: String,
    pub value: String,
    pub change: Option<String>,
    pub change_percent: Option<String>,
    pub volume: Option<i64>,
}

impl From<&IndexLevel> for IndexLevelDB {
    fn from(level: &IndexLevel) -> Self {
        Self {
            index_code: level.index_code.clone(),
            index_name: level.index_name.clone(),
            date: level.date.format(DATE_FORMAT).to_string(),
            value: level.value.to_string(),
            change: level.change.map(|v| v.to_string()),
            change_percent: level.change_percent.map(|v| v.to_string()),
            volume: level.volume,
        }
    }
}

impl From<IndexLevelDB> for IndexLevel {
    fn from(db: IndexLevelDB) -> Self {
        IndexLevel {
            index_code: db.index_code,
            index_name: db.index_name,
            date: NaiveDate::parse_from_str(&db.date, DATE_FORMAT).unwrap_or_default(),
            value: Decimal::from_str(&db.value).unwrap_or_default(),
            change: db.change.and_then(|v| Decimal::from_str(&v).ok()),
            change_percent: db.change_percent.and_then(|v| Decimal::from_str(&v).ok()),
            volume: db.volume,
        }
    }
}
