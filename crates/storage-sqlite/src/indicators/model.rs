use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use marketpulse_core::indicators::MacroIndicator;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for macro indicator observations.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::macro_indicators)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MacroIndicatorDB {
    pub indicator_type: String,
    pub country: String,
    pub date: String,
    pub value: String,
    pub unit: String,
    pub source: String,
}

impl From<&MacroIndicator> for MacroIndicatorDB {
    fn from(indicator: &MacroIndicator) -> Self {
        Self {
            indicator_type: indicator.indicator_type.clone(),
            country: indicator.country.clone(),
            date: indicator.date.format(DATE_FORMAT).to_string(),
            value: indicator.value.to_string(),
            unit: indicator.unit.clone(),
            source: indicator.source.clone(),
        }
    }
}

impl From<MacroIndicatorDB> for MacroIndicator {
    fn from(db: MacroIndicatorDB) -> Self {
        MacroIndicator {
            indicator_type: db.indicator_type,
            country: db.country,
            date: NaiveDate::parse_from_str(&db.date, DATE_FORMAT).unwrap_or_default(),
            value: Decimal::from_str(&db.value).unwrap_or_default(),
            unit: db.unit,
            source: db.source,
        }
    }
}
