//! Job definitions, run locks, and the scheduler/watcher entry points.

mod executor;
mod locks;
mod model;
mod scheduler;
mod watcher;

pub use executor::JobExecutor;
pub use locks::{JobLocks, RunGuard};
pub use model::{Cadence, JobDefinition, JobId, MarketHours};
pub use scheduler::Scheduler;
pub use watcher::SignalWatcher;
