//! # Durable Store
//!
//! Asynchronous persistence of the single `AppState` snapshot.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Durable Store                                     │
//! │                                                                         │
//! │  Session commit                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::save(state) ── JSON payload ──► snapshot table, key             │
//! │                                          "kasir_state", full-row        │
//! │                                          upsert (replace, not merge)    │
//! │                                                                         │
//! │  Startup                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::load() ──► Ok(Some(state))   snapshot present                   │
//! │               ├──► Ok(None)          first run, nothing stored yet      │
//! │               └──► Err(..)           engine unavailable or payload      │
//! │                                      corrupt; caller falls back to      │
//! │                                      the backup mirror                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled: saves happen on
//! every state change and must never corrupt the previously committed
//! snapshot, and WAL gives better crash recovery for exactly that
//! write-often pattern.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use kasir_core::AppState;

/// The one logical key identifying the application state record, in
/// both the durable store and the backup mirror.
pub const STATE_KEY: &str = "kasir_state";

// =============================================================================
// Capability Trait
// =============================================================================

/// Durable persistence of the whole `AppState` snapshot.
///
/// Implementations must make `save` safe to call repeatedly and
/// rapidly: each call fully replaces the stored record and either lands
/// completely or leaves the previous record intact.
#[async_trait]
pub trait Store: Send + Sync {
    /// Loads the stored snapshot. `Ok(None)` means nothing has ever
    /// been saved (first run), which is distinct from an error.
    async fn load(&self) -> StoreResult<Option<AppState>>;

    /// Replaces the stored snapshot with `state`.
    async fn save(&self, state: &AppState) -> StoreResult<()>;

    /// Removes the stored snapshot, returning the store to its
    /// first-run condition.
    async fn clear(&self) -> StoreResult<()>;
}

/// Sessions on one device share one store, so the capability passes
/// through `Arc`.
#[async_trait]
impl<T: Store + ?Sized> Store for std::sync::Arc<T> {
    async fn load(&self) -> StoreResult<Option<AppState>> {
        (**self).load().await
    }

    async fn save(&self, state: &AppState) -> StoreResult<()> {
        (**self).save(state).await
    }

    async fn clear(&self) -> StoreResult<()> {
        (**self).clear().await
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Durable store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/var/lib/kasir/kasir.db").max_connections(2);
/// let store = SqliteStore::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one writer, one concurrent reader is plenty for a till)
    pub max_connections: u32,

    /// Connection timeout duration.
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration with the given database path. The file
    /// is created on connect if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 2,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the maximum number of pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            // In-memory requires a single connection: every connection
            // would otherwise see its own empty database.
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// The production `Store`: one SQLite file holding the snapshot table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database and ensures the schema.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening snapshot store"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL: the snapshot is rewritten on every mutation; readers
            // must never block that write path.
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL: safe from corruption, may lose the very last
            // transaction on power loss. The mirror covers that gap.
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;

        Ok(SqliteStore { pool })
    }

    /// Checks if the database is responsive.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn load(&self) -> StoreResult<Option<AppState>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM snapshot WHERE key = ?1")
                .bind(STATE_KEY)
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(json) => {
                let state: AppState = serde_json::from_str(&json)?;
                debug!(
                    menu = state.menu.len(),
                    sales = state.sales.len(),
                    "Loaded snapshot"
                );
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, state: &AppState) -> StoreResult<()> {
        let payload = serde_json::to_string(state)?;

        sqlx::query(
            r#"
            INSERT INTO snapshot (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(STATE_KEY)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM snapshot WHERE key = ?1")
            .bind(STATE_KEY)
            .execute(&self.pool)
            .await?;
        info!("Snapshot cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
