use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::ActivityEntryDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::activity_log::dsl as log_dsl;
use marketpulse_core::activity::{ActivityEntry, ActivityLogTrait};
use marketpulse_core::Result;

pub struct ActivityRepository {
    pool: Arc<DbPool>,
}

impl ActivityRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Most recent entries, newest first. Read by the API layer for the
    /// status surface; this crate only ever appends.
    pub fn recent(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = log_dsl::activity_log
            .order(log_dsl::created_at.desc())
            .limit(limit)
            .load::<ActivityEntryDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(ActivityEntry::from).collect())
    }
}

#[async_trait]
impl ActivityLogTrait for ActivityRepository {
    async fn append(&self, entry: ActivityEntry) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(log_dsl::activity_log)
            .values(&ActivityEntryDB::from(&entry))
            .execute(&mut conn)
            .into_core()?;

        Ok(())
    }
}
