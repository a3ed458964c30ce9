//! Append-only activity log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;

/// Severity/outcome of an activity entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Info,
    Success,
    Error,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Info => "info",
            ActivityStatus::Success => "success",
            ActivityStatus::Error => "error",
        }
    }
}

/// One record in the activity log. Immutable once written; retention is an
/// external concern.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    /// Origin of the event: "scheduler", "collection", "system".
    pub activity_type: String,
    /// Short human-readable title.
    pub activity: String,
    /// Free-form details (e.g. success/failure counts).
    pub details: String,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(activity_type: &str, activity: &str, details: &str, status: ActivityStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_type: activity_type.to_string(),
            activity: activity.to_string(),
            details: details.to_string(),
            status,
            created_at: Utc::now(),
        }
    }
}

/// Append-only sink for job lifecycle and operational events.
#[async_trait]
pub trait ActivityLogTrait: Send + Sync {
    async fn append(&self, entry: ActivityEntry) -> Result<()>;
}
