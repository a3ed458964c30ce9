//! Market data acquisition for the marketpulse collector.
//!
//! This crate owns everything between the collector jobs and the upstream
//! data sources:
//! - Provider clients ([`provider`]): one HTTP client per upstream source,
//!   each returning normalized quotes with typed errors.
//! - Fallback fetching ([`fetcher`]): an ordered walk over providers where
//!   the first usable quote wins and exhaustion is a normal outcome.
//! - Rate limiting ([`fetcher::RateLimiter`]): a shared per-provider
//!   minimum delay between successive upstream calls.
//!
//! Persistence and scheduling live elsewhere; nothing in this crate touches
//! the database.

pub mod errors;
pub mod fetcher;
pub mod models;
pub mod provider;

pub use errors::ProviderError;
pub use fetcher::{FallbackFetcher, FetchOutcome, RateLimiter};
pub use models::{is_index_symbol, DailyQuote, ExchangeRate, SessionBar};
pub use provider::QuoteProvider;
