//! HTTP headers for upstream provider requests.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

/// Headers for VCI (Vietcap) API requests.
pub fn vci_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://trading.vietcap.com.vn/"),
    );
    headers.insert(
        ORIGIN,
        HeaderValue::from_static("https://trading.vietcap.com.vn/"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Headers for TCBS API requests.
pub fn tcbs_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(REFERER, HeaderValue::from_static("https://tcinvest.tcbs.com.vn/"));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Headers for the Vietcombank exchange-rate endpoint.
pub fn vcb_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vci_headers_has_required_fields() {
        let headers = vci_headers();
        assert!(headers.contains_key(ACCEPT));
        assert!(headers.contains_key(CONTENT_TYPE));
        assert!(headers.contains_key(REFERER));
        assert!(headers.contains_key(ORIGIN));
        assert!(headers.contains_key(USER_AGENT));
    }

    #[test]
    fn test_tcbs_headers_has_user_agent() {
        let headers = tcbs_headers();
        assert!(headers.contains_key(USER_AGENT));
    }
}
