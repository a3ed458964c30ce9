//! Job definitions and cadence types.

use chrono::{NaiveDateTime, Weekday};
use std::time::Duration;

use crate::constants::{
    CTRL_LAST_MACRO_COLLECTION, CTRL_LAST_STOCK_COLLECTION, CTRL_MACRO_TRIGGER, CTRL_STOCK_TRIGGER,
};
use crate::errors::{Error, Result};

/// Identity of a recurring job. One run lock exists per id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobId {
    CollectStock,
    CollectIndices,
    CollectMacro,
}

impl JobId {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobId::CollectStock => "collect_stock",
            JobId::CollectIndices => "collect_indices",
            JobId::CollectMacro => "collect_macro",
        }
    }

    /// Control key an external actor sets to trigger this job manually.
    /// The indices job is scheduler-only.
    pub fn trigger_key(&self) -> Option<&'static str> {
        match self {
            JobId::CollectStock => Some(CTRL_STOCK_TRIGGER),
            JobId::CollectMacro => Some(CTRL_MACRO_TRIGGER),
            JobId::CollectIndices => None,
        }
    }

    /// Control key recording the last completed run. Indices and macro
    /// share the macro collector and its timestamp.
    pub fn last_run_key(&self) -> &'static str {
        match self {
            JobId::CollectStock => CTRL_LAST_STOCK_COLLECTION,
            JobId::CollectIndices | JobId::CollectMacro => CTRL_LAST_MACRO_COLLECTION,
        }
    }

    /// Status value written while this job is running.
    pub fn running_status(&self) -> &'static str {
        match self {
            JobId::CollectStock => "collecting_stocks",
            JobId::CollectIndices => "collecting_indices",
            JobId::CollectMacro => "collecting_macro",
        }
    }
}

/// When a job's timer fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// Every N seconds, regardless of time of day.
    FixedInterval(Duration),
    /// Every N seconds, but only inside the market-hours window; with
    /// `end_of_day` an extra fire happens at window close + 30 minutes.
    MarketHoursInterval { every: Duration, end_of_day: bool },
    /// Once per day at the given local hour:minute.
    DailyAtHour { hour: u32, minute: u32 },
}

/// A named recurring task, immutable at runtime.
#[derive(Clone, Debug)]
pub struct JobDefinition {
    pub id: JobId,
    pub cadence: Cadence,
    pub enabled: bool,
}

/// Trading window used to gate market-hours cadences.
///
/// Hours are inclusive on both ends, matching cron-style hour ranges: an
/// open of 9 and close of 15 means fires between 09:00 and 15:59 pass the
/// gate.
#[derive(Clone, Debug)]
pub struct MarketHours {
    pub open_hour: u32,
    pub close_hour: u32,
    pub days: Vec<Weekday>,
}

impl MarketHours {
    /// Whether a local timestamp falls inside the trading window.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        use chrono::{Datelike, Timelike};

        self.days.contains(&at.weekday())
            && at.hour() >= self.open_hour
            && at.hour() <= self.close_hour
    }

    /// Whether a local timestamp falls on a trading day (any hour).
    pub fn contains_day(&self, at: NaiveDateTime) -> bool {
        use chrono::Datelike;

        self.days.contains(&at.weekday())
    }

    /// Parse a day specification like `"mon-fri"` or `"mon,wed,fri"`.
    pub fn parse_days(spec: &str) -> Result<Vec<Weekday>> {
        const WEEK: &[(&str, Weekday)] = &[
            ("mon", Weekday::Mon),
            ("tue", Weekday::Tue),
            ("wed", Weekday::Wed),
            ("thu", Weekday::Thu),
            ("fri", Weekday::Fri),
            ("sat", Weekday::Sat),
            ("sun", Weekday::Sun),
        ];

        fn index_of(name: &str) -> Option<usize> {
            WEEK.iter().position(|(n, _)| *n == name)
        }

        let spec = spec.trim().to_lowercase();

        if let Some((start, end)) = spec.split_once('-') {
            let start = index_of(start.trim())
                .ok_or_else(|| Error::InvalidConfigValue(format!("unknown day: {start}")))?;
            let end = index_of(end.trim())
                .ok_or_else(|| Error::InvalidConfigValue(format!("unknown day: {end}")))?;

            if start > end {
                return Err(Error::InvalidConfigValue(format!(
                    "day range out of order: {spec}"
                )));
            }

            return Ok(WEEK[start..=end].iter().map(|(_, d)| *d).collect());
        }

        spec.split(',')
            .map(|name| {
                let name = name.trim();
                index_of(name)
                    .map(|i| WEEK[i].1)
                    .ok_or_else(|| Error::InvalidConfigValue(format!("unknown day: {name}")))
            })
            .collect()
    }
}

/// Time until the next local occurrence of `hour:minute`, from `now`.
pub(crate) fn until_next_daily(now: NaiveDateTime, hour: u32, minute: u32) -> Duration {
    let today_target = now
        .date()
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| now.date().and_hms_opt(0, 0, 0).expect("midnight is valid"));

    let target = if today_target > now {
        today_target
    } else {
        today_target + chrono::Duration::days(1)
    };

    (target - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn weekday_hours() -> MarketHours {
        MarketHours {
            open_hour: 9,
            close_hour: 15,
            days: MarketHours::parse_days("mon-fri").unwrap(),
        }
    }

    #[test]
    fn test_parse_day_range() {
        let days = MarketHours::parse_days("mon-fri").unwrap();
        assert_eq!(
            days,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
    }

    #[test]
    fn test_parse_day_list() {
        let days = MarketHours::parse_days("mon,wed,fri").unwrap();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(MarketHours::parse_days("mon-funday").is_err());
        assert!(MarketHours::parse_days("fri-mon").is_err());
    }

    #[test]
    fn test_window_contains_trading_hours() {
        let hours = weekday_hours();

        // Tuesday 2025-03-04 at 10:05 is inside the window.
        assert!(hours.contains(at(2025, 3, 4, 10, 5)));
        // Same day before open and after close.
        assert!(!hours.contains(at(2025, 3, 4, 8, 59)));
        assert!(!hours.contains(at(2025, 3, 4, 16, 0)));
        // Saturday is outside regardless of hour.
        assert!(!hours.contains(at(2025, 3, 8, 10, 5)));
    }

    #[test]
    fn test_close_hour_is_inclusive() {
        let hours = weekday_hours();
        assert!(hours.contains(at(2025, 3, 4, 15, 30)));
    }

    #[test]
    fn test_until_next_daily_later_today() {
        let wait = until_next_daily(at(2025, 3, 4, 5, 0), 6, 0);
        assert_eq!(wait, Duration::from_secs(3600));
    }

    #[test]
    fn test_until_next_daily_rolls_to_tomorrow() {
        let wait = until_next_daily(at(2025, 3, 4, 7, 0), 6, 0);
        assert_eq!(wait, Duration::from_secs(23 * 3600));
    }

    #[test]
    fn test_trigger_keys() {
        assert!(JobId::CollectStock.trigger_key().is_some());
        assert!(JobId::CollectMacro.trigger_key().is_some());
        assert!(JobId::CollectIndices.trigger_key().is_none());
    }
}
