//! Shared helpers for repository tests.

use std::sync::Arc;

use tempfile::TempDir;

use crate::db::{create_pool, init, run_migrations, DbPool};

/// A migrated pool backed by a temp-directory database file.
///
/// The `TempDir` must stay alive for as long as the pool is used.
pub fn test_pool() -> (TempDir, Arc<DbPool>) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir
        .path()
        .join("collector-test.db")
        .to_str()
        .expect("utf-8 temp path")
        .to_string();

    init(&db_path).expect("init database");
    let pool = create_pool(&db_path).expect("create pool");
    run_migrations(&pool).expect("run migrations");

    (dir, pool)
}
