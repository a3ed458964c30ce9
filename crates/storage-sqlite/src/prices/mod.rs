//! SQLite storage for daily prices.

mod model;
mod repository;

pub use model::PriceRecordDB;
pub use repository::PriceRepository;
