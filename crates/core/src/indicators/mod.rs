//! Macro economic indicators and their store trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One macro indicator observation, keyed `(indicator_type, country, date)`.
///
/// Currently the only collected indicator is the USD/VND reference rate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroIndicator {
    pub indicator_type: String,
    pub country: String,
    pub date: NaiveDate,
    pub value: Decimal,
    pub unit: String,
    pub source: String,
}

/// Store trait for macro indicators.
#[async_trait]
pub trait IndicatorStoreTrait: Send + Sync {
    /// Insert-or-overwrite observations keyed on
    /// `(indicator_type, country, date)`.
    async fn upsert_indicators(&self, indicators: &[MacroIndicator]) -> Result<usize>;
}
