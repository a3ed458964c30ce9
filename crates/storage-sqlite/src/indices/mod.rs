//! SQLite storage for market index levels.

mod model;
mod repository;

pub use model::IndexLevelDB;
pub use repository::IndexRepository;
