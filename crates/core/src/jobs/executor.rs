//! Shared job execution path.
//!
//! Both the scheduler and the signal watcher run jobs through the same
//! executor so lifecycle logging and control-plane status updates are
//! identical no matter what pulled the trigger. The caller holds the run
//! lock; the executor only executes.

use chrono::Utc;
use log::{error, info};
use std::sync::Arc;

use crate::activity::{ActivityEntry, ActivityLogTrait, ActivityStatus};
use crate::collect::{JobOutcome, MacroDataCollector, StockDataCollector};
use crate::constants::{
    ACTIVITY_TYPE_COLLECTION, ACTIVITY_TYPE_SCHEDULER, CTRL_COLLECTION_STATUS, STATUS_IDLE,
};
use crate::controls::{ControlKind, ControlStoreTrait};

use super::model::JobId;

/// Runs collection jobs and records their lifecycle.
pub struct JobExecutor {
    stocks: StockDataCollector,
    macros: MacroDataCollector,
    controls: Arc<dyn ControlStoreTrait>,
    activity: Arc<dyn ActivityLogTrait>,
}

impl JobExecutor {
    pub fn new(
        stocks: StockDataCollector,
        macros: MacroDataCollector,
        controls: Arc<dyn ControlStoreTrait>,
        activity: Arc<dyn ActivityLogTrait>,
    ) -> Self {
        Self {
            stocks,
            macros,
            controls,
            activity,
        }
    }

    /// Execute one job run to completion and return its outcome.
    ///
    /// Never returns an error: infrastructure failures are mapped to
    /// [`JobOutcome::Failed`] so the hosting timer loop keeps running.
    /// Control-plane and activity-log write failures are logged and
    /// otherwise ignored; observability must not take down collection.
    pub async fn execute(&self, job: JobId) -> JobOutcome {
        let label = job.as_str();
        info!("Starting {} job", label);

        self.log_activity(
            ACTIVITY_TYPE_SCHEDULER,
            &format!("{label} started"),
            "Collection job triggered",
            ActivityStatus::Info,
        )
        .await;
        self.set_state(CTRL_COLLECTION_STATUS, job.running_status())
            .await;

        let result = match job {
            JobId::CollectStock => self.stocks.run().await,
            JobId::CollectIndices | JobId::CollectMacro => self.macros.run().await,
        };

        let outcome = match result {
            Ok(summary) => {
                let outcome = summary.outcome();
                self.set_state(job.last_run_key(), &Utc::now().to_rfc3339())
                    .await;
                self.log_activity(
                    ACTIVITY_TYPE_COLLECTION,
                    &format!("{label} completed"),
                    &summary.describe(),
                    match outcome {
                        JobOutcome::Failed => ActivityStatus::Error,
                        _ => ActivityStatus::Success,
                    },
                )
                .await;
                outcome
            }
            Err(e) => {
                error!("{} job failed: {}", label, e);
                self.log_activity(
                    ACTIVITY_TYPE_COLLECTION,
                    &format!("{label} failed"),
                    &e.to_string(),
                    ActivityStatus::Error,
                )
                .await;
                JobOutcome::Failed
            }
        };

        self.set_state(CTRL_COLLECTION_STATUS, STATUS_IDLE).await;
        info!("Finished {} job: {}", label, outcome.as_str());
        outcome
    }

    async fn set_state(&self, key: &str, value: &str) {
        if let Err(e) = self.controls.set_control(key, value, ControlKind::State).await {
            error!("Failed to write control '{}': {}", key, e);
        }
    }

    async fn log_activity(
        &self,
        activity_type: &str,
        activity: &str,
        details: &str,
        status: ActivityStatus,
    ) {
        let entry = ActivityEntry::new(activity_type, activity, details, status);
        if let Err(e) = self.activity.append(entry).await {
            error!("Failed to append activity log entry: {}", e);
        }
    }
}
