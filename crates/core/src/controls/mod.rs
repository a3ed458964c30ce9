//! Control-plane store access.
//!
//! The control-plane store is a small key/value table shared with the
//! externally-owned API layer: enable flags and manual triggers flow in,
//! job status flows out. Values are strings by convention
//! (`"true"`/`"false"` for booleans). Readers must hit the store every
//! time; control values are never cached across polling cycles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Role of a control row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Operator-managed configuration value.
    Setting,
    /// One-shot trigger, reset to false on consumption.
    Signal,
    /// Status written by the running job.
    State,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Setting => "setting",
            ControlKind::Signal => "signal",
            ControlKind::State => "state",
        }
    }
}

/// Store trait for the control-plane key/value table.
#[async_trait]
pub trait ControlStoreTrait: Send + Sync {
    /// Read a control value; `None` when the key does not exist.
    fn get_control(&self, key: &str) -> Result<Option<String>>;

    /// Insert-or-overwrite a control value, stamping `updated_at`.
    async fn set_control(&self, key: &str, value: &str, kind: ControlKind) -> Result<()>;

    /// Atomically consume a trigger signal: reset it to `"false"` and
    /// report whether it was `"true"`. At most one caller observes `true`
    /// per set, so a slow job can never be re-triggered by its own stale
    /// flag.
    async fn consume_trigger(&self, key: &str) -> Result<bool>;
}
