//! Error types for provider clients.

use thiserror::Error;

/// Errors a provider client can return from a single fetch attempt.
///
/// Every variant is handled the same way by the fallback fetcher: log and
/// move on to the next provider in the configured order. Clients never
/// retry internally.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The upstream host could not be reached at all.
    #[error("Provider unreachable: {provider} - {message}")]
    Unreachable {
        /// The provider that could not be reached
        provider: String,
        /// Underlying transport error
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The response arrived but could not be parsed into quotes.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the bad payload
        provider: String,
        /// What failed to parse
        message: String,
    },

    /// The provider answered with an empty series for the symbol.
    #[error("No data returned for {symbol}")]
    EmptyResult {
        /// The symbol that came back empty
        symbol: String,
    },

    /// The provider throttled the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that throttled us
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("API error from {provider}: status {status}")]
    Api {
        /// The provider that returned the status
        provider: String,
        /// HTTP status code
        status: u16,
    },
}

impl ProviderError {
    /// Classify a transport-level failure from reqwest.
    pub fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Unreachable {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(provider: &str, status: reqwest::StatusCode) -> Self {
        if status.as_u16() == 429 {
            Self::RateLimited {
                provider: provider.to_string(),
            }
        } else {
            Self::Api {
                provider: provider.to_string(),
                status: status.as_u16(),
            }
        }
    }
}
