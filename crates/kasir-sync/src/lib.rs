//! # kasir-sync: Replication Bus for Kasir POS
//!
//! Same-device, cross-session replication of the committed `AppState`.
//!
//! After every committed mutation a session publishes the full state;
//! every other session applies the newest foreign broadcast as a
//! wholesale replacement. Delivery is at-most-once with no ordering
//! guarantee across sessions: the last broadcast received wins.
//!
//! Hosts without a usable channel fall back to [`NoopBus`] and run
//! single-session without any loss of local correctness.
//!
//! ```rust
//! use kasir_core::AppState;
//! use kasir_sync::{Bus, StateChannel};
//!
//! let channel = StateChannel::default();
//! let till_a = channel.endpoint();
//! let mut till_b = channel.endpoint();
//!
//! till_a.publish(&AppState::seed());
//! assert!(till_b.try_latest().is_some());
//! ```

pub mod bus;

pub use bus::{Bus, BusEndpoint, NoopBus, StateChannel, DEFAULT_CAPACITY};
