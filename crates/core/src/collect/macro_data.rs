//! Market index and macro indicator collection job.

use async_trait::async_trait;
use chrono::Local;
use log::{debug, info, warn};
use marketpulse_market_data::provider::VcbFxClient;
use marketpulse_market_data::{ExchangeRate, FallbackFetcher, FetchOutcome, ProviderError};
use std::sync::Arc;

use super::summary::CollectionSummary;
use crate::errors::Result;
use crate::indicators::{IndicatorStoreTrait, MacroIndicator};
use crate::indices::{IndexLevel, IndexStoreTrait};

/// Index codes collected on every macro run, with display names.
pub const TRACKED_INDICES: &[(&str, &str)] = &[
    ("VNINDEX", "VN-Index"),
    ("HNX", "HNX-Index"),
    ("UPCOM", "UPCOM-Index"),
];

/// Source of reference exchange rates.
///
/// Extracted as a trait so the collector can be exercised without the
/// live Vietcombank endpoint.
#[async_trait]
pub trait FxRateSource: Send + Sync {
    async fn usd_rate(&self) -> std::result::Result<ExchangeRate, ProviderError>;
}

#[async_trait]
impl FxRateSource for VcbFxClient {
    async fn usd_rate(&self) -> std::result::Result<ExchangeRate, ProviderError> {
        VcbFxClient::usd_rate(self).await
    }
}

/// Collects market index levels and macro indicators.
pub struct MacroDataCollector {
    fetcher: Arc<FallbackFetcher>,
    indices: Arc<dyn IndexStoreTrait>,
    indicators: Arc<dyn IndicatorStoreTrait>,
    fx_source: Arc<dyn FxRateSource>,
}

impl MacroDataCollector {
    pub fn new(
        fetcher: Arc<FallbackFetcher>,
        indices: Arc<dyn IndexStoreTrait>,
        indicators: Arc<dyn IndicatorStoreTrait>,
        fx_source: Arc<dyn FxRateSource>,
    ) -> Self {
        Self {
            fetcher,
            indices,
            indicators,
            fx_source,
        }
    }

    /// Run one macro collection pass: tracked indices, then the USD/VND
    /// rate. Per-target failures are recorded and skipped; only store
    /// failures abort the run.
    pub async fn run(&self) -> Result<CollectionSummary> {
        let today = Local::now().date_naive();
        let mut summary = CollectionSummary::new();

        let mut levels: Vec<IndexLevel> = Vec::with_capacity(TRACKED_INDICES.len());
        for (code, name) in TRACKED_INDICES {
            match self.fetcher.fetch_latest(code).await {
                FetchOutcome::Quote(quote) => {
                    debug!("Fetched {} at {}", code, quote.close);
                    levels.push(IndexLevel::from_quote(code, name, today, &quote));
                    summary.record_success();
                }
                FetchOutcome::NoData => {
                    summary.record_failure(code);
                }
            }
        }

        if !levels.is_empty() {
            let written = self.indices.upsert_levels(&levels).await?;
            info!("Saved {} index levels", written);
        }

        match self.fx_source.usd_rate().await {
            Ok(rate) => {
                let indicator = MacroIndicator {
                    indicator_type: "usd_vnd".to_string(),
                    country: "VN".to_string(),
                    date: rate.date,
                    value: rate.value,
                    unit: "VND".to_string(),
                    source: rate.source,
                };
                self.indicators.upsert_indicators(&[indicator]).await?;
                summary.record_success();
            }
            Err(e) => {
                warn!("USD/VND rate fetch failed: {}", e);
                summary.record_failure("usd_vnd");
            }
        }

        summary.log_summary("Macro collection");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::JobOutcome;
    use chrono::NaiveDate;
    use marketpulse_market_data::{DailyQuote, QuoteProvider, RateLimiter};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct IndexProvider;

    #[async_trait]
    impl QuoteProvider for IndexProvider {
        fn id(&self) -> &'static str {
            "P1"
        }

        async fn latest_quote(&self, symbol: &str) -> std::result::Result<DailyQuote, ProviderError> {
            if symbol == "UPCOM" {
                // Simulate one index being unavailable upstream.
                return Err(ProviderError::EmptyResult {
                    symbol: symbol.to_string(),
                });
            }

            Ok(DailyQuote {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                open: None,
                high: None,
                low: None,
                close: dec!(1308.4),
                volume: Some(650_000_000),
                change: Some(dec!(4.2)),
                change_percent: Some(dec!(0.32)),
                source: "P1".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryIndexStore {
        levels: Mutex<HashMap<(String, NaiveDate), IndexLevel>>,
    }

    #[async_trait]
    impl IndexStoreTrait for MemoryIndexStore {
        async fn upsert_levels(&self, levels: &[IndexLevel]) -> Result<usize> {
            let mut map = self.levels.lock().unwrap();
            for level in levels {
                map.insert((level.index_code.clone(), level.date), level.clone());
            }
            Ok(levels.len())
        }

        fn get_level(&self, index_code: &str, date: NaiveDate) -> Result<Option<IndexLevel>> {
            let map = self.levels.lock().unwrap();
            Ok(map.get(&(index_code.to_string(), date)).cloned())
        }
    }

    #[derive(Default)]
    struct MemoryIndicatorStore {
        indicators: Mutex<Vec<MacroIndicator>>,
    }

    #[async_trait]
    impl IndicatorStoreTrait for MemoryIndicatorStore {
        async fn upsert_indicators(&self, indicators: &[MacroIndicator]) -> Result<usize> {
            self.indicators
                .lock()
                .unwrap()
                .extend(indicators.iter().cloned());
            Ok(indicators.len())
        }
    }

    struct FixedRate;

    #[async_trait]
    impl FxRateSource for FixedRate {
        async fn usd_rate(&self) -> std::result::Result<ExchangeRate, ProviderError> {
            Ok(ExchangeRate {
                currency: "USD".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                value: dec!(25210),
                source: "VCB".to_string(),
            })
        }
    }

    struct NoRate;

    #[async_trait]
    impl FxRateSource for NoRate {
        async fn usd_rate(&self) -> std::result::Result<ExchangeRate, ProviderError> {
            Err(ProviderError::Timeout {
                provider: "VCB".to_string(),
            })
        }
    }

    fn fetcher() -> Arc<FallbackFetcher> {
        let provider: Arc<dyn QuoteProvider> = Arc::new(IndexProvider);
        Arc::new(FallbackFetcher::new(
            vec![provider],
            Arc::new(RateLimiter::new(Duration::ZERO)),
        ))
    }

    #[tokio::test]
    async fn test_macro_run_is_partial_when_one_index_missing() {
        let index_store = Arc::new(MemoryIndexStore::default());
        let indicator_store = Arc::new(MemoryIndicatorStore::default());

        let collector = MacroDataCollector::new(
            fetcher(),
            index_store.clone(),
            indicator_store.clone(),
            Arc::new(FixedRate),
        );

        let summary = collector.run().await.unwrap();

        // VNINDEX + HNX + usd_vnd succeed, UPCOM fails.
        assert_eq!(summary.outcome(), JobOutcome::Partial);
        assert_eq!(summary.success, 3);
        assert_eq!(summary.failed, vec!["UPCOM".to_string()]);

        let today = Local::now().date_naive();
        let level = index_store.get_level("VNINDEX", today).unwrap().unwrap();
        assert_eq!(level.value, dec!(1308.4));
        assert_eq!(level.index_name, "VN-Index");

        let indicators = indicator_store.indicators.lock().unwrap();
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0].indicator_type, "usd_vnd");
    }

    #[tokio::test]
    async fn test_fx_failure_does_not_abort_run() {
        let collector = MacroDataCollector::new(
            fetcher(),
            Arc::new(MemoryIndexStore::default()),
            Arc::new(MemoryIndicatorStore::default()),
            Arc::new(NoRate),
        );

        let summary = collector.run().await.unwrap();
        assert!(summary.failed.contains(&"usd_vnd".to_string()));
        assert_eq!(summary.success, 2);
    }
}
