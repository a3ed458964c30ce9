use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::IndexLevelDB;
use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::index_levels::dsl as levels_dsl;
use marketpulse_core::indices::{IndexLevel, IndexStoreTrait};
use marketpulse_core::Result;

pub struct IndexRepository {
    pool: Arc<DbPool>,
}

impl IndexRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndexStoreTrait for IndexRepository {
    async fn upsert_levels(&self, levels: &[IndexLevel]) -> Result<usize> {
        if levels.is_empty() {
            return Ok(0);
        }

        let rows: Vec<IndexLevelDB> = levels.iter().map(IndexLevelDB::from).collect();
        let mut conn = get_connection(&self.pool)?;

        let written = conn
            .immediate_transaction::<_, StorageError, _>(|conn| {
                Ok(diesel::replace_into(levels_dsl::index_levels)
                    .values(&rows)
                    .execute(conn)?)
            })
            .map_err(marketpulse_core::Error::from)?;

        Ok(written)
    }

    fn get_level(&self, index_code: &str, date: NaiveDate) -> Result<Option<IndexLevel>> {
        let mut conn = get_connection(&self.pool)?;

        let row = levels_dsl::index_levels
            .filter(levels_dsl::index_code.eq(index_code))
            .filter(levels_dsl::date.eq(date.format("%Y-%m-%d").to_string()))
            .first::<IndexLevelDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(IndexLevel::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;
    use rust_decimal_macros::dec;

    fn level(value: rust_decimal::Decimal) -> IndexLevel {
        IndexLevel {
            index_code: "VNINDEX".to_string(),
            index_name: "VN-Index".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            value,
            change: Some(dec!(4.2)),
            change_percent: Some(dec!(0.32)),
            volume: Some(650_000_000),
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_day_level() {
        let (_dir, pool) = test_pool();
        let repo = IndexRepository::new(pool);
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();

        repo.upsert_levels(&[level(dec!(1300.0))]).await.unwrap();
        repo.upsert_levels(&[level(dec!(1308.4))]).await.unwrap();

        let stored = repo.get_level("VNINDEX", date).unwrap().unwrap();
        assert_eq!(stored.value, dec!(1308.4));
        assert_eq!(stored.index_name, "VN-Index");
    }
}
