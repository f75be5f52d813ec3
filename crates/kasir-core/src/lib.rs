//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 kasir-session (state container)                 │   │
//! │  │   add_to_cart ─► park_order ─► checkout ─► commit pipeline      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  engine   │   │   │
//! │  │   │ AppState  │  │   Money   │  │   Cart    │  │ checkout  │   │   │
//! │  │   │  ledgers  │  │  rupiah   │  │ CartLine  │  │ park/...  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐                                                 │   │
//! │  │   │  reports  │   NO I/O • NO CLOCK • PURE FUNCTIONS            │   │
//! │  │   └───────────┘                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         kasir-store (SQLite snapshot + backup mirror)           │   │
//! │  │         kasir-sync  (same-device replication bus)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every transition is `(state, params, now) ->
//!    new state`, deterministic, with the clock passed in
//! 2. **Whole-state transitions**: a transition yields a complete new
//!    [`AppState`] or a [`ValidationError`], never a partial update
//! 3. **Integer Money**: all monetary values are whole rupiah (i64)
//! 4. **Effects as values**: checkout returns a print request, it does
//!    not print

pub mod cart;
pub mod engine;
pub mod error;
pub mod money;
pub mod reports;
pub mod types;

pub use cart::{Cart, CartLine};
pub use error::{CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Stock level at or below which an item appears in the low-stock
/// alert (exclusive of sold-out items).
pub const LOW_STOCK_THRESHOLD: i64 = 5;
