use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::MacroIndicatorDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::macro_indicators::dsl as indicators_dsl;
use marketpulse_core::indicators::{IndicatorStoreTrait, MacroIndicator};
use marketpulse_core::Result;

pub struct IndicatorRepository {
    pool: Arc<DbPool>,
}

impl IndicatorRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndicatorStoreTrait for IndicatorRepository {
    async fn upsert_indicators(&self, indicators: &[MacroIndicator]) -> Result<usize> {
        if indicators.is_empty() {
            return Ok(0);
        }

        let rows: Vec<MacroIndicatorDB> = indicators.iter().map(MacroIndicatorDB::from).collect();
        let mut conn = get_connection(&self.pool)?;

        let written = conn
            .immediate_transaction::<_, StorageError, _>(|conn| {
                Ok(diesel::replace_into(indicators_dsl::macro_indicators)
                    .values(&rows)
                    .execute(conn)?)
            })
            .map_err(marketpulse_core::Error::from)?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IntoCore;
    use crate::test_support::test_pool;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_upsert_overwrites_same_observation() {
        let (_dir, pool) = test_pool();
        let repo = IndicatorRepository::new(pool);

        let mut indicator = MacroIndicator {
            indicator_type: "usd_vnd".to_string(),
            country: "VN".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            value: dec!(25180),
            unit: "VND".to_string(),
            source: "VCB".to_string(),
        };

        repo.upsert_indicators(&[indicator.clone()]).await.unwrap();
        indicator.value = dec!(25210);
        repo.upsert_indicators(&[indicator]).await.unwrap();

        let mut conn = get_connection(&repo.pool).unwrap();
        let rows = indicators_dsl::macro_indicators
            .load::<MacroIndicatorDB>(&mut conn)
            .into_core()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "25210");
    }
}
