//! SQLite storage for the control-plane key/value table.

mod model;
mod repository;

pub use model::SystemControlDB;
pub use repository::ControlRepository;
