//! TCBS provider client.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::headers::tcbs_headers;
use super::traits::QuoteProvider;
use crate::errors::ProviderError;
use crate::models::{is_index_symbol, DailyQuote, SessionBar};

const TCBS_BASE_URL: &str = "https://apipubaws.tcbs.com.vn/stock-insight/v1/stock";
const PROVIDER_ID: &str = "TCBS";

const LOOKBACK_SESSIONS: i64 = 7;

/// Client for the TCBS daily bars API.
///
/// Unlike VCI, TCBS already reports equity prices in plain VND, so no
/// scaling is applied.
#[derive(Clone)]
pub struct TcbsClient {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct BarsResponse {
    #[serde(default)]
    data: Vec<TcbsBar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TcbsBar {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
    /// e.g. "2025-03-04T00:00:00.000Z"
    trading_date: String,
}

impl TcbsClient {
    /// Create a new TCBS client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .default_headers(tcbs_headers())
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    async fn fetch_sessions(&self, symbol: &str) -> Result<Vec<SessionBar>, ProviderError> {
        let asset_type = if is_index_symbol(symbol) { "index" } else { "stock" };
        let url = format!(
            "{TCBS_BASE_URL}/bars-long-term?ticker={symbol}&type={asset_type}&resolution=D&to={}&countBack={LOOKBACK_SESSIONS}",
            Utc::now().timestamp()
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, response.status()));
        }

        let body: BarsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        let mut bars: Vec<SessionBar> = body
            .data
            .iter()
            .filter_map(|bar| {
                Some(SessionBar {
                    date: parse_trading_date(&bar.trading_date)?,
                    open: Decimal::from_f64_retain(bar.open).unwrap_or_default(),
                    high: Decimal::from_f64_retain(bar.high).unwrap_or_default(),
                    low: Decimal::from_f64_retain(bar.low).unwrap_or_default(),
                    close: Decimal::from_f64_retain(bar.close).unwrap_or_default(),
                    volume: bar.volume,
                })
            })
            .collect();

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }
}

/// TCBS trading dates are ISO datetimes; only the date part matters for
/// daily bars.
fn parse_trading_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

#[async_trait]
impl QuoteProvider for TcbsClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_quote(&self, symbol: &str) -> Result<DailyQuote, ProviderError> {
        let bars = self.fetch_sessions(symbol).await?;

        DailyQuote::from_sessions(symbol, PROVIDER_ID, &bars).ok_or_else(|| {
            ProviderError::EmptyResult {
                symbol: symbol.to_string(),
            }
        })
    }
}
