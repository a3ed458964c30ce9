//! Per-run collection statistics.

use log::info;

/// Outcome of one job run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// Every target was collected.
    Success,
    /// Some targets were collected, some failed.
    Partial,
    /// Nothing was collected, or an infrastructure error aborted the run.
    Failed,
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Success => "success",
            JobOutcome::Partial => "partial",
            JobOutcome::Failed => "failed",
        }
    }
}

/// Counts accumulated over one collection run.
#[derive(Debug, Default)]
pub struct CollectionSummary {
    pub total: usize,
    pub success: usize,
    /// Symbols that yielded no data from any provider.
    pub failed: Vec<String>,
}

impl CollectionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.total += 1;
        self.success += 1;
    }

    pub fn record_failure(&mut self, symbol: &str) {
        self.total += 1;
        self.failed.push(symbol.to_string());
    }

    pub fn outcome(&self) -> JobOutcome {
        if self.failed.is_empty() {
            JobOutcome::Success
        } else if self.success > 0 {
            JobOutcome::Partial
        } else {
            JobOutcome::Failed
        }
    }

    /// One-line description for activity log details.
    pub fn describe(&self) -> String {
        if self.failed.is_empty() {
            format!("success count={}, failed count=0", self.success)
        } else {
            format!(
                "success count={}, failed count={} ({})",
                self.success,
                self.failed.len(),
                self.failed.join(", ")
            )
        }
    }

    pub fn log_summary(&self, label: &str) {
        info!(
            "{}: {}/{} collected, {} failed",
            label,
            self.success,
            self.total,
            self.failed.len()
        );
    }
}
