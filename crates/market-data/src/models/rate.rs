use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reference exchange rate for one currency pair on one date.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Foreign currency code (e.g. "USD"); the quote currency is VND
    pub currency: String,

    /// Date the rate was published
    pub date: NaiveDate,

    /// Transfer rate in VND
    pub value: Decimal,

    /// Provider id the rate came from
    pub source: String,
}
