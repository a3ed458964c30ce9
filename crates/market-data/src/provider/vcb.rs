//! Vietcombank reference exchange-rate client.

use chrono::Local;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use super::headers::vcb_headers;
use crate::errors::ProviderError;
use crate::models::ExchangeRate;

const VCB_RATES_URL: &str =
    "https://portal.vietcombank.com.vn/Usercontrols/TVPortal.TyGia/pXML.aspx";
const PROVIDER_ID: &str = "VCB";

/// Client for the Vietcombank daily exchange-rate feed.
///
/// The endpoint serves XML; the transfer rate for a currency is pulled out
/// of the `Exrate` element attributes. Not a [`QuoteProvider`]: exchange
/// rates feed the macro indicator table, not the price table.
///
/// [`QuoteProvider`]: super::QuoteProvider
#[derive(Clone)]
pub struct VcbFxClient {
    client: Client,
}

impl VcbFxClient {
    /// Create a new VCB client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .default_headers(vcb_headers())
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch today's USD/VND transfer rate.
    pub async fn usd_rate(&self) -> Result<ExchangeRate, ProviderError> {
        let response = self
            .client
            .get(VCB_RATES_URL)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_ID, e))?;

        let value = extract_transfer_rate(&body, "USD").ok_or_else(|| {
            ProviderError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "no USD transfer rate in rate feed".to_string(),
            }
        })?;

        Ok(ExchangeRate {
            currency: "USD".to_string(),
            date: Local::now().date_naive(),
            value,
            source: PROVIDER_ID.to_string(),
        })
    }
}

/// Pull the `Transfer` attribute for a currency out of the XML body.
/// Rates use comma thousands separators (e.g. "25,410.00").
fn extract_transfer_rate(body: &str, currency: &str) -> Option<Decimal> {
    let pattern = format!(
        r#"CurrencyCode="{currency}"[^>]*Transfer="([\d,.]+)""#
    );
    let re = Regex::new(&pattern).ok()?;
    let raw = re.captures(body)?.get(1)?.as_str().replace(',', "");
    Decimal::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"<ExrateList>
        <Exrate CurrencyCode="EUR" CurrencyName="EURO" Buy="26,100.00" Transfer="26,363.63" Sell="27,200.00"/>
        <Exrate CurrencyCode="USD" CurrencyName="US DOLLAR" Buy="25,180.00" Transfer="25,210.00" Sell="25,540.00"/>
    </ExrateList>"#;

    #[test]
    fn test_extract_usd_transfer_rate() {
        assert_eq!(extract_transfer_rate(SAMPLE, "USD"), Some(dec!(25210.00)));
    }

    #[test]
    fn test_extract_missing_currency() {
        assert_eq!(extract_transfer_rate(SAMPLE, "JPY"), None);
    }
}
