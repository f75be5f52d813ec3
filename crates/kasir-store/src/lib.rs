//! # kasir-store: Persistence Layer for Kasir POS
//!
//! Durable persistence of the single `AppState` snapshot, plus the
//! best-effort backup mirror.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kasir POS Data Flow                                │
//! │                                                                         │
//! │  Session commit (kasir-session)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kasir-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  SqliteStore  │    │  FileMirror   │    │  migrations  │   │   │
//! │  │   │  (store.rs)   │    │  (mirror.rs)  │    │  (embedded)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ async, WAL,   │    │ sync JSON     │    │ snapshot     │   │   │
//! │  │   │ one snapshot  │    │ file, fire    │    │ table        │   │   │
//! │  │   │ row           │    │ and forget    │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   MemoryStore / MemoryMirror (memory.rs) for tests              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kasir.db (SQLite, WAL) + kasir_state_backup.json                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both backends address the record through the one logical key
//! [`STATE_KEY`]; a save replaces the whole record and never merges.

pub mod error;
pub mod memory;
pub mod migrations;
pub mod mirror;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryMirror, MemoryStore};
pub use mirror::{FileMirror, Mirror};
pub use store::{SqliteStore, Store, StoreConfig, STATE_KEY};
