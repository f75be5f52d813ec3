//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQLite Error (sqlx::Error) / serde_json::Error                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← categorized, with context                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kasir-session: logged at warn and SWALLOWED. A failed save never       │
//! │  fails the operation that triggered it; the in-memory state stays       │
//! │  authoritative and the next mutation retries naturally.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database file could not be opened or the pool could not connect.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema setup failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// A read or write against the snapshot table failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// The stored payload could not be encoded or decoded.
    ///
    /// On load this means the snapshot is corrupt; callers treat the
    /// store as unavailable and fall back to the backup mirror.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed(err.to_string())
            }
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
