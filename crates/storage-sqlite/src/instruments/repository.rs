use diesel::prelude::*;
use std::sync::Arc;

use super::model::InstrumentDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::instruments::dsl::*;
use marketpulse_core::instruments::{Instrument, InstrumentRepositoryTrait};
use marketpulse_core::Result;

pub struct InstrumentRepository {
    pool: Arc<DbPool>,
}

impl InstrumentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl InstrumentRepositoryTrait for InstrumentRepository {
    fn get_active(&self) -> Result<Vec<Instrument>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = instruments
            .filter(is_active.eq(true))
            .order(symbol.asc())
            .load::<InstrumentDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Instrument::from).collect())
    }
}
