//! VCI (Vietcap) provider client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::headers::vci_headers;
use super::traits::QuoteProvider;
use crate::errors::ProviderError;
use crate::models::{is_index_symbol, DailyQuote, SessionBar};

const VCI_BASE_URL: &str = "https://trading.vietcap.com.vn/api";
const PROVIDER_ID: &str = "VCI";

/// VCI reports equity prices in 1000 VND units; index levels are in points
/// and must not be scaled.
const PRICE_MULTIPLIER: i64 = 1000;

/// Sessions to look back so weekends/holidays still leave a previous close.
const LOOKBACK_SESSIONS: i64 = 7;

/// Client for the VCI OHLC chart API.
#[derive(Clone)]
pub struct VciClient {
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OhlcRequest {
    time_frame: String,
    symbols: Vec<String>,
    to: i64,
    count_back: i64,
}

/// Raw OHLC response (parallel arrays). Timestamps may arrive as strings
/// or integers depending on the endpoint revision.
#[derive(Debug, Deserialize)]
struct OhlcResponse {
    #[serde(deserialize_with = "deserialize_timestamps")]
    t: Vec<i64>,
    o: Vec<f64>,
    h: Vec<f64>,
    l: Vec<f64>,
    c: Vec<f64>,
    v: Vec<i64>,
}

fn deserialize_timestamps<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|value| match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| de::Error::custom("invalid timestamp number")),
            serde_json::Value::String(s) => s
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid timestamp string: {s}"))),
            _ => Err(de::Error::custom("expected number or string for timestamp")),
        })
        .collect()
}

impl VciClient {
    /// Create a new VCI client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .default_headers(vci_headers())
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    async fn fetch_sessions(&self, symbol: &str) -> Result<Vec<SessionBar>, ProviderError> {
        let url = format!("{VCI_BASE_URL}/chart/OHLCChart/gap-chart");

        let payload = OhlcRequest {
            time_frame: "ONE_DAY".to_string(),
            symbols: vec![symbol.to_string()],
            to: Utc::now().timestamp(),
            count_back: LOOKBACK_SESSIONS,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, response.status()));
        }

        let data: Vec<OhlcResponse> = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        let series = match data.into_iter().next() {
            Some(series) if !series.t.is_empty() => series,
            _ => return Ok(vec![]),
        };

        Ok(transform_series(symbol, &series))
    }
}

fn transform_series(symbol: &str, series: &OhlcResponse) -> Vec<SessionBar> {
    let multiplier = if is_index_symbol(symbol) {
        Decimal::ONE
    } else {
        Decimal::from(PRICE_MULTIPLIER)
    };

    series
        .t
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();

            Some(SessionBar {
                date,
                open: Decimal::from_f64_retain(series.o[i]).unwrap_or_default() * multiplier,
                high: Decimal::from_f64_retain(series.h[i]).unwrap_or_default() * multiplier,
                low: Decimal::from_f64_retain(series.l[i]).unwrap_or_default() * multiplier,
                close: Decimal::from_f64_retain(series.c[i]).unwrap_or_default() * multiplier,
                volume: series.v[i],
            })
        })
        .collect()
}

#[async_trait]
impl QuoteProvider for VciClient {
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
