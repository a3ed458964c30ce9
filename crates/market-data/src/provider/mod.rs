//! Upstream provider clients.
//!
//! One module per source. Each client makes exactly one outbound call per
//! invocation and normalizes prices to VND before returning; retries across
//! sources are the fallback fetcher's job, not the client's.

mod headers;
mod tcbs;
mod traits;
mod vcb;
mod vci;

pub use tcbs::TcbsClient;
pub use traits::QuoteProvider;
pub use vcb::VcbFxClient;
pub use vci::VciClient;
