//! Data collection jobs.
//!
//! Each collector walks its target set, fetches through the fallback
//! machinery and merges successes into the store. A single symbol failing
//! never aborts a run; only a store failure does.

mod macro_data;
mod stock_data;
mod summary;

pub use macro_data::{FxRateSource, MacroDataCollector, TRACKED_INDICES};
pub use stock_data::StockDataCollector;
pub use summary::{CollectionSummary, JobOutcome};
