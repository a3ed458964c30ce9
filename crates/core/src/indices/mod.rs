//! Market index levels and their store trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use marketpulse_market_data::DailyQuote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One market index on one trading date, keyed `(index_code, date)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexLevel {
    pub index_code: String,
    pub index_name: String,
    pub date: NaiveDate,
    /// Closing level in points.
    pub value: Decimal,
    pub change: Option<Decimal>,
    pub change_percent: Option<Decimal>,
    pub volume: Option<i64>,
}

impl IndexLevel {
    /// Build a level for `date` from a fetched index quote.
    pub fn from_quote(code: &str, name: &str, date: NaiveDate, quote: &DailyQuote) -> Self {
        Self {
            index_code: code.to_string(),
            index_name: name.to_string(),
            date,
            value: quote.close,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
        }
    }
}

/// Store trait for index levels.
#[async_trait]
pub trait IndexStoreTrait: Send + Sync {
    /// Insert-or-overwrite levels keyed on `(index_code, date)`.
    async fn upsert_levels(&self, levels: &[IndexLevel]) -> Result<usize>;

    /// Read back one level, if present.
    fn get_level(&self, index_code: &str, date: NaiveDate) -> Result<Option<IndexLevel>>;
}
