//! Control-plane signal watcher.
//!
//! Lets an external actor (the API layer, an operator at a SQL prompt)
//! wake a job without a message bus: set the job's trigger key to
//! `"true"` and the watcher picks it up on its next poll. Triggers are
//! advisory wake-ups, not guaranteed-delivery commands: a trigger that
//! arrives while the same job is running is consumed and dropped.

use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::executor::JobExecutor;
use super::locks::JobLocks;
use super::model::JobId;
use crate::activity::{ActivityEntry, ActivityLogTrait, ActivityStatus};
use crate::constants::ACTIVITY_TYPE_SYSTEM;
use crate::controls::ControlStoreTrait;

/// Jobs that can be triggered through the control plane.
const WATCHED_JOBS: &[JobId] = &[JobId::CollectStock, JobId::CollectMacro];

/// Polls the control-plane store for manual trigger signals.
pub struct SignalWatcher {
    controls: Arc<dyn ControlStoreTrait>,
    executor: Arc<JobExecutor>,
    locks: Arc<JobLocks>,
    activity: Arc<dyn ActivityLogTrait>,
    poll_interval: Duration,
}

impl SignalWatcher {
    pub fn new(
        controls: Arc<dyn ControlStoreTrait>,
        executor: Arc<JobExecutor>,
        locks: Arc<JobLocks>,
        activity: Arc<dyn ActivityLogTrait>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            controls,
            executor,
            locks,
            activity,
            poll_interval,
        }
    }

    /// One poll cycle over every watched trigger key.
    ///
    /// The trigger is reset *before* the job starts, so a slow run cannot
    /// be re-triggered by its own stale flag. If the run lock is held the
    /// consumed trigger is treated as already satisfied.
    pub async fn poll_once(&self) {
        for &job in WATCHED_JOBS {
            let key = match job.trigger_key() {
                Some(key) => key,
                None => continue,
            };

            match self.controls.consume_trigger(key).await {
                Ok(true) => {
                    info!("Manual trigger for {} received", job.as_str());
                    match self.locks.try_acquire(job) {
                        Some(_guard) => {
                            self.executor.execute(job).await;
                        }
                        None => {
                            info!(
                                "Job {} is already running, manual trigger satisfied by the run in progress",
                                job.as_str()
                            );
                        }
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    // Keep polling; a flaky store read must not kill the loop.
                    error!("Failed to read trigger '{}': {}", key, e);
                }
            }
        }
    }

    /// Spawn the polling loop.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Signal watcher started (poll interval {}s)",
                self.poll_interval.as_secs()
            );

            let started = ActivityEntry::new(
                ACTIVITY_TYPE_SYSTEM,
                "Job watcher started",
                "Monitoring for job trigger signals",
                ActivityStatus::Info,
            );
            if let Err(e) = self.activity.append(started).await {
                error!("Failed to append watcher startup entry: {}", e);
            }

            loop {
                tokio::select! {
                    _ = shutdown.changed() => {
                        debug!("Signal watcher stopping");
                        break;
                    }
                    _ = tokio::time::sleep(self.poll_interval) => {
                        self.poll_once().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityEntry, ActivityLogTrait};
    use crate::collect::{FxRateSource, MacroDataCollector, StockDataCollector};
    use crate::controls::ControlKind;
    use crate::errors::Result;
    use crate::indicators::{IndicatorStoreTrait, MacroIndicator};
    use crate::indices::{IndexLevel, IndexStoreTrait};
    use crate::instruments::{Instrument, InstrumentRepositoryTrait};
    use crate::prices::{PriceRecord, PriceStoreTrait};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use marketpulse_market_data::{
        DailyQuote, ExchangeRate, FallbackFetcher, ProviderError, QuoteProvider, RateLimiter,
    };
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Control store backed by a map, with the same atomic consume
    /// semantics as the SQLite implementation.
    #[derive(Default)]
    struct MemoryControlStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl MemoryControlStore {
        fn set(&self, key: &str, value: &str) {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        fn get(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl ControlStoreTrait for MemoryControlStore {
        fn get_control(&self, key: &str) -> Result<Option<String>> {
            Ok(self.get(key))
        }

        async fn set_control(&self, key: &str, value: &str, _kind: ControlKind) -> Result<()> {
            self.set(key, value);
            Ok(())
        }

        async fn consume_trigger(&self, key: &str) -> Result<bool> {
            let mut values = self.values.lock().unwrap();
            if values.get(key).map(String::as_str) == Some("true") {
                values.insert(key.to_string(), "false".to_string());
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[derive(Default)]
    struct MemoryActivityLog {
        entries: Mutex<Vec<ActivityEntry>>,
    }

    #[async_trait]
    impl ActivityLogTrait for MemoryActivityLog {
        async fn append(&self, entry: ActivityEntry) -> Result<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct OneInstrument;

    impl InstrumentRepositoryTrait for OneInstrument {
        fn get_active(&self) -> Result<Vec<Instrument>> {
            Ok(vec![Instrument {
                id: "VNM".to_string(),
                symbol: "VNM".to_string(),
                name: None,
                is_active: true,
            }])
        }
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QuoteProvider for CountingProvider {
        fn id(&self) -> &'static str {
            "P1"
        }

        async fn latest_quote(
            &self,
            symbol: &str,
        ) -> std::result::Result<DailyQuote, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DailyQuote {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                open: None,
                high: None,
                low: None,
                close: dec!(65700),
                volume: None,
                change: None,
                change_percent: None,
                source: "P1".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct NullPriceStore;

    #[async_trait]
    impl PriceStoreTrait for NullPriceStore {
        async fn upsert_prices(&self, records: &[PriceRecord]) -> Result<usize> {
            Ok(records.len())
        }

        fn get_price(&self, _id: &str, _date: NaiveDate) -> Result<Option<PriceRecord>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct NullIndexStore;

    #[async_trait]
    impl IndexStoreTrait for NullIndexStore {
        async fn upsert_levels(&self, levels: &[IndexLevel]) -> Result<usize> {
            Ok(levels.len())
        }

        fn get_level(&self, _code: &str, _date: NaiveDate) -> Result<Option<IndexLevel>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct NullIndicatorStore;

    #[async_trait]
    impl IndicatorStoreTrait for NullIndicatorStore {
        async fn upsert_indicators(&self, indicators: &[MacroIndicator]) -> Result<usize> {
            Ok(indicators.len())
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

    fn build_watcher(
        controls: Arc<MemoryControlStore>,
        locks: Arc<JobLocks>,
        provider_calls: Arc<AtomicUsize>,
    ) -> SignalWatcher {
        let provider: Arc<dyn QuoteProvider> = Arc::new(CountingProvider {
            calls: provider_calls,
        });
        let fetcher = Arc::new(FallbackFetcher::new(
            vec![provider],
            Arc::new(RateLimiter::new(Duration::ZERO)),
        ));

        let stocks = StockDataCollector::new(
            Arc::new(OneInstrument),
            fetcher.clone(),
            Arc::new(NullPriceStore),
        );
        let macros = MacroDataCollector::new(
            fetcher,
            Arc::new(NullIndexStore),
            Arc::new(NullIndicatorStore),
            Arc::new(NoRate),
        );

        let activity = Arc::new(MemoryActivityLog::default());
        let executor = Arc::new(JobExecutor::new(
            stocks,
            macros,
            controls.clone(),
            activity.clone(),
        ));

        SignalWatcher::new(controls, executor, locks, activity, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_trigger_runs_job_and_resets_signal() {
        let controls = Arc::new(MemoryControlStore::default());
        let locks = Arc::new(JobLocks::new());
        let calls = Arc::new(AtomicUsize::new(0));

        controls.set(crate::constants::CTRL_STOCK_TRIGGER, "true");
        let watcher = build_watcher(controls.clone(), locks, calls.clone());

        watcher.poll_once().await;

        assert_eq!(
            controls.get(crate::constants::CTRL_STOCK_TRIGGER).as_deref(),
            Some("false")
        );
        // One instrument fetched once.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Status was reset when the run finished.
        assert_eq!(
            controls
                .get(crate::constants::CTRL_COLLECTION_STATUS)
                .as_deref(),
            Some(crate::constants::STATUS_IDLE)
        );
    }

    #[tokio::test]
    async fn test_trigger_consumed_once() {
        let controls = Arc::new(MemoryControlStore::default());
        let locks = Arc::new(JobLocks::new());
        let calls = Arc::new(AtomicUsize::new(0));

        controls.set(crate::constants::CTRL_STOCK_TRIGGER, "true");
        let watcher = build_watcher(controls.clone(), locks, calls.clone());

        watcher.poll_once().await;
        watcher.poll_once().await;

        // The second poll found the signal already consumed.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_trigger_skipped_while_job_running() {
        let controls = Arc::new(MemoryControlStore::default());
        let locks = Arc::new(JobLocks::new());
        let calls = Arc::new(AtomicUsize::new(0));

        controls.set(crate::constants::CTRL_STOCK_TRIGGER, "true");
        let watcher = build_watcher(controls.clone(), locks.clone(), calls.clone());

        // Simulate a scheduler-driven run holding the lock.
        let _guard = locks.try_acquire(JobId::CollectStock).unwrap();

        watcher.poll_once().await;

        // The trigger is consumed but no second execution happened.
        assert_eq!(
            controls.get(crate::constants::CTRL_STOCK_TRIGGER).as_deref(),
            Some("false")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
