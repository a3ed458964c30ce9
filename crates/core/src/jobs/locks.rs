//! Per-job run locks.
//!
//! At most one execution per job id may be in flight, whether it was
//! started by the scheduler or the signal watcher. Acquisition is a
//! non-blocking try: the loser of a race skips its fire instead of
//! queueing, so a stuck upstream can never build a backlog of runs.

use log::warn;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::model::JobId;

/// Tracks which jobs are currently running.
pub struct JobLocks {
    running: Mutex<HashSet<JobId>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(HashSet::new()),
        }
    }

    fn lock_running(&self) -> MutexGuard<'_, HashSet<JobId>> {
        self.running.lock().unwrap_or_else(|poisoned| {
            warn!("Job lock mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Try to acquire the run lock for a job.
    ///
    /// Returns a guard that releases on drop, or `None` when the job is
    /// already running.
    pub fn try_acquire(self: &Arc<Self>, job: JobId) -> Option<RunGuard> {
        let mut running = self.lock_running();

        if running.contains(&job) {
            None
        } else {
            running.insert(job);
            Some(RunGuard {
                locks: Arc::clone(self),
                job,
            })
        }
    }

    /// Whether no job is currently running. Used by the shutdown drain.
    pub fn is_idle(&self) -> bool {
        self.lock_running().is_empty()
    }

    fn release(&self, job: JobId) {
        self.lock_running().remove(&job);
    }
}

impl Default for JobLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard holding one job's run lock.
pub struct RunGuard {
    locks: Arc<JobLocks>,
    job: JobId,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.locks.release(self.job);
    }
}
