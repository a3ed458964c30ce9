//! Provider trait definition.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::DailyQuote;

/// A single upstream quote source.
///
/// Implementations are stateless beyond their HTTP client and make one
/// outbound request per call. They must apply any source-specific price
/// scaling before returning, so every `DailyQuote` leaving a provider is
/// in plain VND (or index points for index symbols).
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used for ordering, rate limiting and logging
    /// (e.g. "VCI", "TCBS").
    fn id(&self) -> &'static str;

    /// Fetch the most recent daily quote for a symbol.
    ///
    /// Looks back a few sessions so the change versus the previous close
    /// can be derived. Returns [`ProviderError::EmptyResult`] when the
    /// source has no sessions for the symbol.
    async fn latest_quote(&self, symbol: &str) -> Result<DailyQuote, ProviderError>;
}
