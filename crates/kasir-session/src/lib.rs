//! # kasir-session: Session Container for Kasir POS
//!
//! One open till session: the explicit state container that owns the
//! committed `AppState` and the private cart, and the only place the
//! state is ever swapped.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    kasir-session (THIS CRATE)                           │
//! │                                                                         │
//! │   UI / host                                                             │
//! │       │  add_to_cart, park_order, checkout, ...                         │
//! │       ▼                                                                 │
//! │   Session<S: Store, M: Mirror, B: Bus>                                  │
//! │       │                                                                 │
//! │       ├── delegate ──► kasir-core engine (pure transition)              │
//! │       │                     │                                           │
//! │       │   accepted new state▼                                           │
//! │       └── commit pipeline: Store::save ─► Mirror::save_backup ─►        │
//! │                            Bus::publish                                 │
//! │                                                                         │
//! │   sync_from_peers(): newest foreign broadcast replaces local state      │
//! │   wholesale; the private cart is never touched by replication.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed durable save is logged and swallowed: the in-memory state
//! stays authoritative for the rest of the session and the next
//! mutation retries naturally. The mirror write and the broadcast are
//! attempted regardless.
//!
//! ```rust,ignore
//! use kasir_session::{AppConfig, Session};
//! use kasir_store::{FileMirror, SqliteStore, StoreConfig};
//! use kasir_sync::StateChannel;
//!
//! let config = AppConfig::load_or_default(None);
//! let store = SqliteStore::connect(StoreConfig::new(&config.storage.database_path)).await?;
//! let mirror = FileMirror::new(&config.storage.backup_path);
//! let channel = StateChannel::new(config.replication.capacity);
//!
//! let mut till = Session::open(store, mirror, channel.endpoint()).await;
//! till.add_to_cart("m1")?;
//! let effect = till.checkout(Money::from_rupiah(10_000), PaymentMethod::Tunai).await?;
//! ```

pub mod config;
pub mod export;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use export::{MenuRow, SalesRow, StockRow};
pub use session::Session;
