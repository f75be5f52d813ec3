//! # Schema Setup
//!
//! Embedded schema for the snapshot store.
//!
//! The whole application state is one record under one key, so the
//! schema is a single table. It is applied with an idempotent
//! `CREATE TABLE IF NOT EXISTS` on every connect; there is no migration
//! history to track until a second table or column ever appears.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// The snapshot table: one row per logical key, currently exactly one.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snapshot (
    key        TEXT PRIMARY KEY,
    payload    TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// Applies the schema. Safe to run on every connect.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    debug!("Ensuring snapshot schema");
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
    Ok(())
}
