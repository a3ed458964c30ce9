//! Timer-driven job scheduling.
//!
//! One tokio task per configured cadence. Timer fires that find the job
//! already running are dropped, not queued; fires outside the market-hours
//! window are dropped as well. Every task watches the shutdown channel and
//! exits without starting new work once it flips.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::executor::JobExecutor;
use super::locks::JobLocks;
use super::model::{until_next_daily, Cadence, JobDefinition, JobId, MarketHours};

/// Minute past the close hour for the end-of-day fire.
const END_OF_DAY_MINUTE: u32 = 30;

/// Builds and spawns the timer tasks for all configured jobs.
pub struct Scheduler {
    jobs: Vec<JobDefinition>,
    market_hours: MarketHours,
    executor: Arc<JobExecutor>,
    locks: Arc<JobLocks>,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(
        jobs: Vec<JobDefinition>,
        market_hours: MarketHours,
        executor: Arc<JobExecutor>,
        locks: Arc<JobLocks>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            jobs,
            market_hours,
            executor,
            locks,
            shutdown,
        }
    }

    /// Spawn one timer task per enabled job (plus the end-of-day task for
    /// cadences that ask for it). Disabled or misconfigured jobs simply get
    /// no timer.
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        let mut scheduled = 0usize;

        for job in &self.jobs {
            if !job.enabled {
                info!("Job {} is disabled, no timer created", job.id.as_str());
                continue;
            }

            match &job.cadence {
                Cadence::FixedInterval(every) => {
                    if every.is_zero() {
                        warn!("Job {} has a zero interval, skipping", job.id.as_str());
                        continue;
                    }
                    info!(
                        "Job {}: every {}s (24/7)",
                        job.id.as_str(),
                        every.as_secs()
                    );
                    handles.push(self.spawn_interval(job.id, *every, false));
                    scheduled += 1;
                }
                Cadence::MarketHoursInterval { every, end_of_day } => {
                    if every.is_zero() {
                        warn!("Job {} has a zero interval, skipping", job.id.as_str());
                        continue;
                    }
                    info!(
                        "Job {}: every {}s during market hours ({}-{})",
                        job.id.as_str(),
                        every.as_secs(),
                        self.market_hours.open_hour,
                        self.market_hours.close_hour
                    );
                    handles.push(self.spawn_interval(job.id, *every, true));
                    scheduled += 1;

                    if *end_of_day {
                        info!(
                            "Job {}: end-of-day fire at {}:{:02}",
                            job.id.as_str(),
                            self.market_hours.close_hour,
                            END_OF_DAY_MINUTE
                        );
                        handles.push(self.spawn_daily(
                            job.id,
                            self.market_hours.close_hour,
                            END_OF_DAY_MINUTE,
                            true,
                        ));
                        scheduled += 1;
                    }
                }
                Cadence::DailyAtHour { hour, minute } => {
                    info!(
                        "Job {}: daily at {}:{:02}",
                        job.id.as_str(),
                        hour,
                        minute
                    );
                    handles.push(self.spawn_daily(job.id, *hour, *minute, false));
                    scheduled += 1;
                }
            }
        }

        info!("Total timers scheduled: {}", scheduled);
        handles
    }

    fn spawn_interval(&self, job: JobId, every: Duration, gated: bool) -> JoinHandle<()> {
        let executor = Arc::clone(&self.executor);
        let locks = Arc::clone(&self.locks);
        let market_hours = self.market_hours.clone();
        let mut shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; swallow it so the job
            // first fires one full interval after startup.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.changed() => {
                        debug!("Timer for {} stopping", job.as_str());
                        break;
                    }
                    _ = interval.tick() => {
                        if gated && !market_hours.contains(chrono::Local::now().naive_local()) {
                            debug!(
                                "Timer fire for {} outside market hours, dropped",
                                job.as_str()
                            );
                            continue;
                        }
                        try_run(job, &executor, &locks).await;
                    }
                }
            }
        })
    }

    fn spawn_daily(
        &self,
        job: JobId,
        hour: u32,
        minute: u32,
        trading_days_only: bool,
    ) -> JoinHandle<()> {
        let executor = Arc::clone(&self.executor);
        let locks = Arc::clone(&self.locks);
        let market_hours = self.market_hours.clone();
        let mut shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                let now = chrono::Local::now().naive_local();
                let wait = until_next_daily(now, hour, minute);

                tokio::select! {
                    _ = shutdown.changed() => {
                        debug!("Daily timer for {} stopping", job.as_str());
                        break;
                    }
                    _ = tokio::time::sleep(wait) => {
                        let fired_at = chrono::Local::now().naive_local();
                        if trading_days_only && !market_hours.contains_day(fired_at) {
                            debug!(
                                "Daily fire for {} on a non-trading day, dropped",
                                job.as_str()
                            );
                            continue;
                        }
                        try_run(job, &executor, &locks).await;
                    }
                }
            }
        })
    }
}

/// Run the job if its lock is free; otherwise drop the fire.
async fn try_run(job: JobId, executor: &Arc<JobExecutor>, locks: &Arc<JobLocks>) {
    match locks.try_acquire(job) {
        Some(_guard) => {
            executor.execute(job).await;
        }
        None => {
            info!(
                "Job {} is already running, this fire is skipped",
                job.as_str()
            );
        }
    }
}
