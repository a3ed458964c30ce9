//! Marketpulse collector daemon.
//!
//! Hosts the job scheduler and the control-plane signal watcher in one
//! long-lived process. Also runnable as a one-shot collector for testing
//! and backfills (`--now`, `--stocks-only`, `--macro-only`).

mod config;
mod state;

use clap::Parser;
use std::time::Duration;
use tokio::sync::watch;

use config::Config;
use marketpulse_core::jobs::{JobId, Scheduler, SignalWatcher};
use state::{build_state, AppState};

/// How long shutdown waits for an in-flight job before giving up.
const DRAIN_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "marketpulse-collector")]
#[command(about = "Marketpulse scheduled market data collector", long_about = None)]
#[command(version)]
struct Cli {
    /// Run all collection jobs immediately and exit
    #[arg(long)]
    now: bool,

    /// Run stock collection only and exit
    #[arg(long)]
    stocks_only: bool,

    /// Run macro collection only and exit
    #[arg(long)]
    macro_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    state::init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let state = build_state(&config)?;

    if cli.now {
        run_once(&state, JobId::CollectStock).await;
        run_once(&state, JobId::CollectMacro).await;
        return Ok(());
    }
    if cli.stocks_only {
        run_once(&state, JobId::CollectStock).await;
        return Ok(());
    }
    if cli.macro_only {
        run_once(&state, JobId::CollectMacro).await;
        return Ok(());
    }

    run_daemon(state, &config).await
}

/// One inline job run, used by the one-shot CLI modes.
async fn run_once(state: &AppState, job: JobId) {
    match state.locks.try_acquire(job) {
        Some(_guard) => {
            state.executor.execute(job).await;
        }
        None => tracing::warn!("Job {} is already running", job.as_str()),
    }
}

async fn run_daemon(state: AppState, config: &Config) -> anyhow::Result<()> {
    tracing::info!("Marketpulse collector starting");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = Scheduler::new(
        state.jobs,
        state.market_hours,
        state.executor.clone(),
        state.locks.clone(),
        shutdown_rx.clone(),
    );
    let mut handles = scheduler.spawn();

    let watcher = SignalWatcher::new(
        state.controls.clone(),
        state.executor.clone(),
        state.locks.clone(),
        state.activity.clone(),
        config.watcher_poll_interval,
    );
    handles.push(watcher.spawn(shutdown_rx));

    wait_for_termination().await;
    tracing::info!("Shutdown signal received, no new work will be scheduled");

    // Flip the shutdown flag; every timer and the watcher exits at its
    // next poll, leaving only the in-flight job (if any).
    let _ = shutdown_tx.send(true);

    let drained = tokio::time::timeout(DRAIN_DEADLINE, async {
        while !state.locks.is_idle() {
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            "In-flight job did not finish within {}s, terminating",
            DRAIN_DEADLINE.as_secs()
        );
    }

    for handle in handles {
        handle.abort();
    }

    tracing::info!("Marketpulse collector stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
