//! Process wiring: tracing, storage, providers, and job definitions.

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketpulse_core::activity::ActivityLogTrait;
use marketpulse_core::collect::{MacroDataCollector, StockDataCollector};
use marketpulse_core::controls::ControlStoreTrait;
use marketpulse_core::jobs::{Cadence, JobDefinition, JobExecutor, JobId, JobLocks, MarketHours};
use marketpulse_market_data::provider::{TcbsClient, VcbFxClient, VciClient};
use marketpulse_market_data::{FallbackFetcher, QuoteProvider, RateLimiter};
use marketpulse_storage_sqlite::activity::ActivityRepository;
use marketpulse_storage_sqlite::controls::ControlRepository;
use marketpulse_storage_sqlite::indicators::IndicatorRepository;
use marketpulse_storage_sqlite::indices::IndexRepository;
use marketpulse_storage_sqlite::instruments::InstrumentRepository;
use marketpulse_storage_sqlite::prices::PriceRepository;
use marketpulse_storage_sqlite::{create_pool, db, run_migrations};

use crate::config::Config;

/// Everything the daemon needs after bootstrap.
pub struct AppState {
    pub executor: Arc<JobExecutor>,
    pub locks: Arc<JobLocks>,
    pub controls: Arc<dyn ControlStoreTrait>,
    pub activity: Arc<dyn ActivityLogTrait>,
    pub jobs: Vec<JobDefinition>,
    pub market_hours: MarketHours,
}

pub fn init_tracing() {
    let log_format = std::env::var("MP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let db_path = db::init(&config.db_path).context("initializing database")?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;

    // Repositories
    let instruments = Arc::new(InstrumentRepository::new(pool.clone()));
    let prices = Arc::new(PriceRepository::new(pool.clone()));
    let indices = Arc::new(IndexRepository::new(pool.clone()));
    let indicators = Arc::new(IndicatorRepository::new(pool.clone()));
    let controls: Arc<dyn ControlStoreTrait> = Arc::new(ControlRepository::new(pool.clone()));
    let activity: Arc<dyn ActivityLogTrait> = Arc::new(ActivityRepository::new(pool));

    // Providers, in configured fallback order.
    let mut providers: Vec<Arc<dyn QuoteProvider>> = Vec::new();
    for name in [&config.sources.primary, &config.sources.fallback] {
        if providers.iter().any(|p| p.id() == name.as_str()) {
            continue;
        }
        providers.push(build_provider(name, config)?);
    }

    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_delay));
    let fetcher = Arc::new(FallbackFetcher::new(providers, rate_limiter));

    // Collectors and the shared executor.
    let stocks = StockDataCollector::new(instruments, fetcher.clone(), prices);
    let macros = MacroDataCollector::new(
        fetcher,
        indices,
        indicators,
        Arc::new(VcbFxClient::new(config.sources.timeout)),
    );
    let executor = Arc::new(JobExecutor::new(
        stocks,
        macros,
        controls.clone(),
        activity.clone(),
    ));

    let market_hours = MarketHours {
        open_hour: config.market_hours.open_hour,
        close_hour: config.market_hours.close_hour,
        days: MarketHours::parse_days(&config.market_hours.days)
            .map_err(|e| anyhow::anyhow!("invalid MARKET_DAYS: {e}"))?,
    };

    Ok(AppState {
        executor,
        locks: Arc::new(JobLocks::new()),
        controls,
        activity,
        jobs: job_definitions(config),
        market_hours,
    })
}

fn build_provider(name: &str, config: &Config) -> anyhow::Result<Arc<dyn QuoteProvider>> {
    let timeout = config.sources.timeout;
    match name.to_uppercase().as_str() {
        "VCI" => Ok(Arc::new(VciClient::new(timeout))),
        "TCBS" => Ok(Arc::new(TcbsClient::new(timeout))),
        other => bail!("unknown data source: {other}"),
    }
}

/// Translate the configuration into job definitions.
///
/// The macro job may appear twice (daily fire plus interval fire); both
/// entries share one JobId and therefore one run lock. With the master
/// switch off no timers exist at all, but manual triggers keep working.
fn job_definitions(config: &Config) -> Vec<JobDefinition> {
    if !config.auto_collect_enabled {
        tracing::warn!("Automated data collection is disabled (AUTO_COLLECT_ENABLED=false)");
        return Vec::new();
    }

    let mut jobs = Vec::new();

    jobs.push(JobDefinition {
        id: JobId::CollectStock,
        cadence: if config.stock.market_hours_only {
            Cadence::MarketHoursInterval {
                every: config.stock.interval,
                end_of_day: config.stock.end_of_day,
            }
        } else {
            Cadence::FixedInterval(config.stock.interval)
        },
        enabled: config.stock.enabled,
    });

    jobs.push(JobDefinition {
        id: JobId::CollectIndices,
        cadence: if config.indices.market_hours_only {
            Cadence::MarketHoursInterval {
                every: config.indices.interval,
                end_of_day: false,
            }
        } else {
            Cadence::FixedInterval(config.indices.interval)
        },
        enabled: config.indices.enabled,
    });

    if config.macro_data.daily_update {
        jobs.push(JobDefinition {
            id: JobId::CollectMacro,
            cadence: Cadence::DailyAtHour {
                hour: config.macro_data.daily_update_hour,
                minute: 0,
            },
            enabled: config.macro_data.enabled,
        });
    }

    // Interval-based macro collection, unless it would duplicate the
    // daily fire.
    let macro_interval = config.macro_data.interval;
    if !macro_interval.is_zero() && macro_interval.as_secs() != 86_400 {
        jobs.push(JobDefinition {
            id: JobId::CollectMacro,
            cadence: Cadence::FixedInterval(macro_interval),
            enabled: config.macro_data.enabled,
        });
    }

    jobs
}
