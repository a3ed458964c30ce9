use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::PriceRecordDB;
use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::daily_prices::dsl as prices_dsl;
use marketpulse_core::prices::{PriceRecord, PriceStoreTrait};
use marketpulse_core::Result;

pub struct PriceRepository {
    pool: Arc<DbPool>,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStoreTrait for PriceRepository {
    async fn upsert_prices(&self, records: &[PriceRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let rows: Vec<PriceRecordDB> = records.iter().map(PriceRecordDB::from).collect();
        let mut conn = get_connection(&self.pool)?;

        let written = conn
            .immediate_transaction::<_, StorageError, _>(|conn| {
                let mut total = 0;
                for chunk in rows.chunks(1_000) {
                    total += diesel::replace_into(prices_dsl::daily_prices)
                        .values(chunk)
                        .execute(conn)?;
                }
                Ok(total)
            })
            .map_err(marketpulse_core::Error::from)?;

        Ok(written)
    }

    fn get_price(&self, instrument_id: &str, date: NaiveDate) -> Result<Option<PriceRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let row = prices_dsl::daily_prices
            .filter(prices_dsl::instrument_id.eq(instrument_id))
            .filter(prices_dsl::date.eq(date.format("%Y-%m-%d").to_string()))
            .first::<PriceRecordDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(PriceRecord::from))
    }
}
