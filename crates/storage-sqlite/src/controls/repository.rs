use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::SystemControlDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::system_controls::dsl::*;
use marketpulse_core::controls::{ControlKind, ControlStoreTrait};
use marketpulse_core::Result;

pub struct ControlRepository {
    pool: Arc<DbPool>,
}

impl ControlRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ControlStoreTrait for ControlRepository {
    fn get_control(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;

        system_controls
            .filter(control_key.eq(key))
            .select(control_value)
            .first::<String>(&mut conn)
            .optional()
            .into_core()
    }

    async fn set_control(&self, key: &str, value: &str, kind: ControlKind) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        diesel::replace_into(system_controls)
            .values(&SystemControlDB {
                control_key: key.to_string(),
                control_value: value.to_string(),
                control_type: kind.as_str().to_string(),
                updated_at: Utc::now().to_rfc3339(),
            })
            .execute(&mut conn)
            .into_core()?;

        Ok(())
    }

    async fn consume_trigger(&self, key: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        // Single conditional UPDATE: the reset only succeeds for the one
        // caller that still sees "true", so consumption is at-most-once.
        let reset = diesel::update(
            system_controls
                .filter(control_key.eq(key))
                .filter(control_value.eq("true")),
        )
        .set((
            control_value.eq("false"),
            updated_at.eq(Utc::now().to_rfc3339()),
        ))
        .execute(&mut conn)
        .into_core()?;

        Ok(reset > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;
    use marketpulse_core::constants::CTRL_STOCK_TRIGGER;

    #[tokio::test]
    async fn test_set_and_get_control() {
        let (_dir, pool) = test_pool();
        let repo = ControlRepository::new(pool);

        repo.set_control("system.collection_status", "collecting_stocks", ControlKind::State)
            .await
            .unwrap();

        assert_eq!(
            repo.get_control("system.collection_status").unwrap(),
            Some("collecting_stocks".to_string())
        );
    }

    #[test]
    fn test_unknown_key_reads_as_none() {
        let (_dir, pool) = test_pool();
        let repo = ControlRepository::new(pool);

        assert_eq!(repo.get_control("no.such.key").unwrap(), None);
    }

    #[tokio::test]
    async fn test_trigger_consumed_exactly_once() {
        let (_dir, pool) = test_pool();
        let repo = ControlRepository::new(pool);

        repo.set_control(CTRL_STOCK_TRIGGER, "true", ControlKind::Signal)
            .await
            .unwrap();

        assert!(repo.consume_trigger(CTRL_STOCK_TRIGGER).await.unwrap());
        // The flag is false immediately after consumption.
        assert_eq!(
            repo.get_control(CTRL_STOCK_TRIGGER).unwrap(),
            Some("false".to_string())
        );
        // A second consume finds nothing.
        assert!(!repo.consume_trigger(CTRL_STOCK_TRIGGER).await.unwrap());
    }

    #[tokio::test]
    async fn test_consume_missing_trigger_is_false() {
        let (_dir, pool) = test_pool();
        let repo = ControlRepository::new(pool);

        assert!(!repo.consume_trigger("job.nothing.trigger").await.unwrap());
    }

    #[tokio::test]
    async fn test_seeded_trigger_rows_exist() {
        let (_dir, pool) = test_pool();
        let repo = ControlRepository::new(pool);

        // The migration seeds the known signal rows as false.
        assert_eq!(
            repo.get_control(CTRL_STOCK_TRIGGER).unwrap(),
            Some("false".to_string())
        );
    }
}
