//! SQLite storage for macro indicators.

mod model;
mod repository;

pub use model::MacroIndicatorDB;
pub use repository::IndicatorRepository;
