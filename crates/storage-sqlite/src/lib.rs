//! SQLite storage implementation for the marketpulse collector.
//!
//! This crate is the only place where Diesel dependencies exist. It
//! implements the store traits defined in `marketpulse-core`:
//! - connection pooling, pragmas and embedded migrations ([`db`])
//! - repositories for instruments, prices, index levels, macro
//!   indicators, control signals and the activity log
//!
//! All writes are transactional upserts keyed on the tables' natural
//! unique constraints, so re-running a collection for the same date can
//! never duplicate rows.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod activity;
pub mod controls;
pub mod indicators;
pub mod indices;
pub mod instruments;
pub mod prices;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from marketpulse-core for convenience
pub use marketpulse_core::errors::{DatabaseError, Error, Result};
