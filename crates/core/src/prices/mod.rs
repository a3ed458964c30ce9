//! Daily price records and their store trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use marketpulse_market_data::DailyQuote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One instrument on one trading date.
///
/// Uniquely identified by `(instrument_id, date)`; re-ingestion overwrites
/// every numeric field. Optional fields stay `None` when the provider had
/// no value, so absence is never stored as zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub instrument_id: String,
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
    pub change: Option<Decimal>,
    pub change_percent: Option<Decimal>,
    /// Provider id the values came from.
    pub source: String,
}

impl PriceRecord {
    /// Build a record for `date` from a fetched quote.
    pub fn from_quote(instrument_id: &str, date: NaiveDate, quote: &DailyQuote) -> Self {
        Self {
            instrument_id: instrument_id.to_string(),
            date,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            change: quote.change,
            change_percent: quote.change_percent,
            source: quote.source.clone(),
        }
    }
}

/// Store trait for daily prices.
#[async_trait]
pub trait PriceStoreTrait: Send + Sync {
    /// Insert-or-overwrite records keyed on `(instrument_id, date)`.
    /// Returns the number of rows written.
    async fn upsert_prices(&self, records: &[PriceRecord]) -> Result<usize>;

    /// Read back one record, if present.
    fn get_price(&self, instrument_id: &str, date: NaiveDate) -> Result<Option<PriceRecord>>;
}
