//! Environment-driven collector configuration.
//!
//! Every knob comes from the environment (usually via `.env`). Parsing
//! happens once at startup, and an invalid value is fatal: a collector
//! running on a half-understood configuration is worse than one that
//! refuses to start.

use anyhow::{bail, Context};
use std::env;
use std::time::Duration;

/// Cadence and feature flags for stock price collection.
#[derive(Clone, Debug)]
pub struct StockCollection {
    pub enabled: bool,
    pub interval: Duration,
    pub market_hours_only: bool,
    pub end_of_day: bool,
}

/// Cadence and feature flags for index collection.
#[derive(Clone, Debug)]
pub struct IndexCollection {
    pub enabled: bool,
    pub interval: Duration,
    pub market_hours_only: bool,
}

/// Cadence and feature flags for macro indicator collection.
#[derive(Clone, Debug)]
pub struct MacroCollection {
    pub enabled: bool,
    pub interval: Duration,
    pub daily_update: bool,
    pub daily_update_hour: u32,
}

/// Trading window configuration.
#[derive(Clone, Debug)]
pub struct MarketHoursConfig {
    pub open_hour: u32,
    pub close_hour: u32,
    pub days: String,
}

/// Upstream source configuration.
#[derive(Clone, Debug)]
pub struct DataSources {
    pub primary: String,
    pub fallback: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub db_path: String,
    pub auto_collect_enabled: bool,
    pub stock: StockCollection,
    pub indices: IndexCollection,
    pub macro_data: MacroCollection,
    pub market_hours: MarketHoursConfig,
    pub sources: DataSources,
    pub rate_limit_delay: Duration,
    /// Reserved for per-provider retry; fallback is the retry mechanism
    /// today, so this stays 0.
    pub max_retries: u32,
    pub watcher_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            db_path: env_string("DATABASE_URL", "data/collector.db"),
            auto_collect_enabled: env_bool("AUTO_COLLECT_ENABLED", true)?,
            stock: StockCollection {
                enabled: env_bool("STOCK_COLLECTION_ENABLED", true)?,
                interval: Duration::from_secs(env_u64("STOCK_COLLECTION_INTERVAL", 3600)?),
                market_hours_only: env_bool("STOCK_COLLECTION_MARKET_HOURS_ONLY", true)?,
                end_of_day: env_bool("STOCK_COLLECTION_END_OF_DAY", true)?,
            },
            indices: IndexCollection {
                enabled: env_bool("INDEX_COLLECTION_ENABLED", true)?,
                interval: Duration::from_secs(env_u64("INDEX_COLLECTION_INTERVAL", 1800)?),
                market_hours_only: env_bool("INDEX_COLLECTION_MARKET_HOURS_ONLY", false)?,
            },
            macro_data: MacroCollection {
                enabled: env_bool("MACRO_COLLECTION_ENABLED", true)?,
                interval: Duration::from_secs(env_u64("MACRO_COLLECTION_INTERVAL", 3600)?),
                daily_update: env_bool("MACRO_DAILY_UPDATE", true)?,
                daily_update_hour: env_u64("MACRO_DAILY_UPDATE_HOUR", 6)? as u32,
            },
            market_hours: MarketHoursConfig {
                open_hour: env_u64("MARKET_OPEN_HOUR", 9)? as u32,
                close_hour: env_u64("MARKET_CLOSE_HOUR", 15)? as u32,
                days: env_string("MARKET_DAYS", "mon-fri"),
            },
            sources: DataSources {
                primary: env_string("STOCK_DATA_SOURCE_PRIMARY", "VCI"),
                fallback: env_string("STOCK_DATA_SOURCE_FALLBACK", "TCBS"),
                timeout: Duration::from_secs(env_u64("STOCK_DATA_TIMEOUT", 30)?),
            },
            rate_limit_delay: Duration::from_secs_f64(env_f64(
                "COLLECTION_RATE_LIMIT_DELAY",
                0.3,
            )?),
            max_retries: env_u64("COLLECTION_MAX_RETRIES", 0)? as u32,
            watcher_poll_interval: Duration::from_secs(env_u64("WATCHER_POLL_INTERVAL", 5)?),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.market_hours.open_hour >= self.market_hours.close_hour {
            bail!(
                "MARKET_OPEN_HOUR ({}) must be before MARKET_CLOSE_HOUR ({})",
                self.market_hours.open_hour,
                self.market_hours.close_hour
            );
        }
        if self.market_hours.close_hour > 23 {
            bail!("MARKET_CLOSE_HOUR must be a valid hour of day");
        }
        if self.macro_data.daily_update_hour > 23 {
            bail!("MACRO_DAILY_UPDATE_HOUR must be a valid hour of day");
        }
        if self.stock.enabled && self.stock.interval.is_zero() {
            bail!("STOCK_COLLECTION_INTERVAL must be positive");
        }
        if self.indices.enabled && self.indices.interval.is_zero() {
            bail!("INDEX_COLLECTION_INTERVAL must be positive");
        }
        Ok(())
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(key) {
        Ok(raw) => parse_bool(&raw).with_context(|| format!("invalid boolean in {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid integer in {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn env_f64(key: &str, default: f64) -> anyhow::Result<f64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid number in {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_forms() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }
}
