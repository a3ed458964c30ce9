//! Control-plane keys and activity vocabulary shared across the collector.

// Trigger signals, set by the API layer and consumed by the watcher.
pub const CTRL_STOCK_TRIGGER: &str = "job.collect_stock.trigger";
pub const CTRL_MACRO_TRIGGER: &str = "job.collect_macro.trigger";

// State signals, written by the running job for observability.
pub const CTRL_COLLECTION_STATUS: &str = "system.collection_status";
pub const CTRL_LAST_STOCK_COLLECTION: &str = "system.last_stock_collection";
pub const CTRL_LAST_MACRO_COLLECTION: &str = "system.last_macro_collection";

/// Status value while no job is running.
pub const STATUS_IDLE: &str = "idle";

// Activity log entry types.
pub const ACTIVITY_TYPE_SCHEDULER: &str = "scheduler";
pub const ACTIVITY_TYPE_COLLECTION: &str = "collection";
pub const ACTIVITY_TYPE_SYSTEM: &str = "system";
