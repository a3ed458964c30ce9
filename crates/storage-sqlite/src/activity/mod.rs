//! SQLite storage for the activity log.

mod model;
mod repository;

pub use model::ActivityEntryDB;
pub use repository::ActivityRepository;
