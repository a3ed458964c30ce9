//! Ordered-fallback quote fetching.
//!
//! The fetcher walks a configured list of providers in order; the first one
//! to return a usable quote wins. A provider failure of any kind moves on
//! to the next provider, and running out of providers is the
//! [`FetchOutcome::NoData`] value rather than an error. Delisted and
//! illiquid symbols exhaust the list routinely and must not abort a
//! collection run.

mod rate_limiter;

pub use rate_limiter::RateLimiter;

use log::{debug, warn};
use std::sync::Arc;

use crate::models::DailyQuote;
use crate::provider::QuoteProvider;

/// Result of one fallback fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A provider returned a usable quote.
    Quote(DailyQuote),
    /// Every provider failed or returned nothing; a normal outcome.
    NoData,
}

impl FetchOutcome {
    /// The quote, if one was fetched.
    pub fn into_quote(self) -> Option<DailyQuote> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::NoData => None,
        }
    }
}

/// Walks providers in configured order until one returns a quote.
///
/// The rate limiter is shared with every other fetch path in the process,
/// so concurrent jobs hitting the same provider still serialize through
/// one per-provider delay.
pub struct FallbackFetcher {
    providers: Vec<Arc<dyn QuoteProvider>>,
    rate_limiter: Arc<RateLimiter>,
}

impl FallbackFetcher {
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            providers,
            rate_limiter,
        }
    }

    /// Fetch the latest quote for a symbol, trying each provider once.
    pub async fn fetch_latest(&self, symbol: &str) -> FetchOutcome {
        for provider in &self.providers {
            self.rate_limiter.acquire(provider.id()).await;

            match provider.latest_quote(symbol).await {
                Ok(quote) => {
                    debug!("Fetched {} from provider '{}'", symbol, provider.id());
                    return FetchOutcome::Quote(quote);
                }
                Err(e) => {
                    debug!(
                        "Provider '{}' failed for {}: {}, trying next",
                        provider.id(),
                        symbol,
                        e
                    );
                }
            }
        }

        warn!("All providers exhausted for {}", symbol);
        FetchOutcome::NoData
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockProvider {
        id: &'static str,
        call_count: AtomicUsize,
        should_fail: bool,
    }

    impl MockProvider {
        fn new(id: &'static str, should_fail: bool) -> Arc<Self> {
            Arc::new(Self {
                id,
                call_count: AtomicUsize::new(0),
                should_fail,
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn latest_quote(&self, symbol: &str) -> Result<DailyQuote, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if self.should_fail {
                Err(ProviderError::EmptyResult {
                    symbol: symbol.to_string(),
                })
            } else {
                Ok(DailyQuote {
                    symbol: symbol.to_string(),
                    date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                    open: Some(dec!(95)),
                    high: Some(dec!(101)),
                    low: Some(dec!(94)),
                    close: dec!(100),
                    volume: Some(1_000),
                    change: Some(dec!(5)),
                    change_percent: Some(dec!(5.26)),
                    source: self.id.to_string(),
                })
            }
        }
    }

    fn fetcher(providers: Vec<Arc<MockProvider>>) -> FallbackFetcher {
        let providers: Vec<Arc<dyn QuoteProvider>> = providers
            .into_iter()
            .map(|p| p as Arc<dyn QuoteProvider>)
            .collect();
        FallbackFetcher::new(providers, Arc::new(RateLimiter::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let p1 = MockProvider::new("P1", false);
        let p2 = MockProvider::new("P2", false);
        let f = fetcher(vec![p1.clone(), p2.clone()]);

        let outcome = f.fetch_latest("VNM").await;

        let quote = outcome.into_quote().unwrap();
        assert_eq!(quote.source, "P1");
        assert_eq!(p1.calls(), 1);
        assert_eq!(p2.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_stops_at_first_success() {
        let p1 = MockProvider::new("P1", true);
        let p2 = MockProvider::new("P2", false);
        let p3 = MockProvider::new("P3", false);
        let f = fetcher(vec![p1.clone(), p2.clone(), p3.clone()]);

        let outcome = f.fetch_latest("VNM").await;

        let quote = outcome.into_quote().unwrap();
        assert_eq!(quote.source, "P2");
        assert_eq!(p1.calls(), 1);
        assert_eq!(p2.calls(), 1);
        assert_eq!(p3.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_is_no_data_not_error() {
        let p1 = MockProvider::new("P1", true);
        let p2 = MockProvider::new("P2", true);
        let f = fetcher(vec![p1.clone(), p2.clone()]);

        let outcome = f.fetch_latest("DELISTED").await;

        assert!(matches!(outcome, FetchOutcome::NoData));
        // Each provider tried exactly once, never retried.
        assert_eq!(p1.calls(), 1);
        assert_eq!(p2.calls(), 1);
    }
}
