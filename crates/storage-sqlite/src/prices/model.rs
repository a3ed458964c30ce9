use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use marketpulse_core::prices::PriceRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for daily prices. Decimal values are stored as TEXT to
/// keep them exact.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::daily_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceRecordDB {
    pub instrument_id: String,
    pub date: String,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: String,
    pub volume: Option<i64>,
    pub change: Option<String>,
    pub change_percent: Option<String>,
    pub source: String,
    pub created_at: String,
}

fn decimal_to_db(value: Option<Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn decimal_from_db(value: Option<String>) -> Option<Decimal> {
    value.and_then(|v| Decimal::from_str(&v).ok())
}

impl From<&PriceRecord> for PriceRecordDB {
    fn from(record: &PriceRecord) -> Self {
        Self {
            instrument_id: record.instrument_id.clone(),
            date: record.date.format(DATE_FORMAT).to_string(),
            open: decimal_to_db(record.open),
            high: decimal_to_db(record.high),
            low: decimal_to_db(record.low),
            close: record.close.to_string(),
            volume: record.volume,
            change: decimal_to_db(record.change),
            change_percent: decimal_to_db(record.change_percent),
            source: record.source.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl From<PriceRecordDB> for PriceRecord {
    fn from(db: PriceRecordDB) -> Self {
        PriceRecord {
            instrument_id: db.instrument_id,
            date: NaiveDate::parse_from_str(&db.date, DATE_FORMAT).unwrap_or_default(),
            open: decimal_from_db(db.open),
            high: decimal_from_db(db.high),
            low: decimal_from_db(db.low),
            close: Decimal::from_str(&db.close).unwrap_or_default(),
            volume: db.volume,
            change: decimal_from_db(db.change),
            change_percent: decimal_from_db(db.change_percent),
            source: db.source,
        }
    }
}
