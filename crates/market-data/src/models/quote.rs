use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading session as returned by a provider, already normalized to
/// the target currency unit.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// Normalized daily quote for one instrument.
///
/// `change` and `change_percent` are derived from the previous session's
/// close and are absent when the provider returned fewer than two
/// sessions. Absence must never be stored as zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyQuote {
    /// Instrument symbol as known upstream
    pub symbol: String,

    /// Trading date of the latest session
    pub date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing price (required)
    pub close: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,

    /// Absolute change versus the previous session's close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,

    /// Change as a percentage of the previous session's close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,

    /// Provider id the quote came from
    pub source: String,
}

impl DailyQuote {
    /// Build the latest quote from an ascending series of session bars.
    ///
    /// Returns `None` for an empty series. With two or more sessions the
    /// change fields are filled from the second-to-last close.
    pub fn from_sessions(symbol: &str, source: &str, bars: &[SessionBar]) -> Option<Self> {
        let latest = bars.last()?;

        let (change, change_percent) = if bars.len() >= 2 {
            let prev_close = bars[bars.len() - 2].close;
            if prev_close.is_zero() {
                (None, None)
            } else {
                let change = latest.close - prev_close;
                let percent = change / prev_close * Decimal::from(100);
                (Some(change), Some(percent))
            }
        } else {
            (None, None)
        };

        Some(Self {
            symbol: symbol.to_string(),
            date: latest.date,
            open: Some(latest.open),
            high: Some(latest.high),
            low: Some(latest.low),
            close: latest.close,
            volume: Some(latest.volume),
            change,
            change_percent,
            source: source.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(date: NaiveDate, close: Decimal) -> SessionBar {
        SessionBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_from_sessions_empty() {
        assert!(DailyQuote::from_sessions("VNM", "VCI", &[]).is_none());
    }

    #[test]
    fn test_single_session_has_no_change() {
        let bars = vec![bar(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), dec!(65000))];
        let quote = DailyQuote::from_sessions("VNM", "VCI", &bars).unwrap();

        assert_eq!(quote.close, dec!(65000));
        assert!(quote.change.is_none());
        assert!(quote.change_percent.is_none());
    }

    #[test]
    fn test_change_derived_from_previous_close() {
        let bars = vec![
            bar(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), dec!(95)),
            bar(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), dec!(100)),
        ];
        let quote = DailyQuote::from_sessions("BBB", "VCI", &bars).unwrap();

        assert_eq!(quote.change, Some(dec!(5)));
        // 5 / 95 * 100 = 5.263...
        assert_eq!(quote.change_percent.unwrap().round_dp(2), dec!(5.26));
    }

    #[test]
    fn test_zero_previous_close_leaves_change_absent() {
        let bars = vec![
            bar(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), dec!(0)),
            bar(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), dec!(100)),
        ];
        let quote = DailyQuote::from_sessions("BBB", "VCI", &bars).unwrap();

        assert!(quote.change.is_none());
        assert!(quote.change_percent.is_none());
    }
}
