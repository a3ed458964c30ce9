//! Stock price collection job.

use chrono::Local;
use log::{info, warn};
use marketpulse_market_data::{FallbackFetcher, FetchOutcome};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::summary::CollectionSummary;
use crate::errors::Result;
use crate::instruments::{default_instruments, InstrumentRepositoryTrait};
use crate::prices::{PriceRecord, PriceStoreTrait};

/// Collects the latest daily price for every active instrument.
pub struct StockDataCollector {
    instruments: Arc<dyn InstrumentRepositoryTrait>,
    fetcher: Arc<FallbackFetcher>,
    prices: Arc<dyn PriceStoreTrait>,
}

impl StockDataCollector {
    pub fn new(
        instruments: Arc<dyn InstrumentRepositoryTrait>,
        fetcher: Arc<FallbackFetcher>,
        prices: Arc<dyn PriceStoreTrait>,
    ) -> Self {
        Self {
            instruments,
            fetcher,
            prices,
        }
    }

    /// Run one collection pass over the active instrument set.
    ///
    /// A symbol with no data from any provider is recorded as failed and
    /// the run continues; an `Err` is returned only for infrastructure
    /// failures (instrument read or price write), which fail the whole
    /// run.
    pub async fn run(&self) -> Result<CollectionSummary> {
        let mut universe = self.instruments.get_active()?;
        if universe.is_empty() {
            warn!("Instrument table is empty, falling back to the default symbol list");
            universe = default_instruments();
        }

        info!("Collecting prices for {} instruments", universe.len());

        let today = Local::now().date_naive();
        let mut summary = CollectionSummary::new();
        let mut collected: Vec<PriceRecord> = Vec::with_capacity(universe.len());

        for instrument in &universe {
            match self.fetcher.fetch_latest(&instrument.symbol).await {
                FetchOutcome::Quote(quote) if quote.close > Decimal::ZERO => {
                    collected.push(PriceRecord::from_quote(&instrument.id, today, &quote));
                    summary.record_success();
                }
                _ => {
                    summary.record_failure(&instrument.symbol);
                }
            }
        }

        if !collected.is_empty() {
            let written = self.prices.upsert_prices(&collected).await?;
            info!("Saved {} price records", written);
        }

        summary.log_summary("Stock collection");
        Ok(summary)
    }
}
