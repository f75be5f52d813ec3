//! # Replication Bus
//!
//! Broadcasts the full committed state to every other open session on
//! the device, and applies incoming state as a wholesale replacement.
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Delivery Model                                    │
//! │                                                                         │
//! │  publish(S)  ──►  every endpoint EXCEPT the publisher                   │
//! │                                                                         │
//! │  • at-most-once: a receiver that lags past the channel capacity         │
//! │    skips the dropped frames and moves on                                │
//! │  • last-write-wins: try_latest() drains everything pending and          │
//! │    keeps only the newest foreign state                                  │
//! │  • no merging: the received state replaces local state whole            │
//! │                                                                         │
//! │  Two sessions committing near-simultaneously can silently lose one      │
//! │  session's mutation. Accepted trade-off for a single-operator kiosk     │
//! │  running a handful of sessions on one device.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use kasir_core::AppState;

/// Default frame capacity per receiver. Overruns drop oldest frames,
/// which last-write-wins semantics tolerate by design of the model.
pub const DEFAULT_CAPACITY: usize = 16;

// =============================================================================
// Capability Trait
// =============================================================================

/// The replication capability a session holds.
///
/// `publish` is fire-and-forget; `try_latest` is the cooperative poll
/// a session runs before reading shared state.
pub trait Bus: Send {
    /// Broadcasts the full committed state to all other endpoints.
    fn publish(&self, state: &AppState);

    /// Drains pending broadcasts and returns the newest state published
    /// by ANOTHER endpoint, if any arrived since the last poll.
    fn try_latest(&mut self) -> Option<AppState>;
}

// =============================================================================
// Broadcast Channel
// =============================================================================

/// One broadcast frame: the publisher's identity plus the state.
#[derive(Debug, Clone)]
struct Frame {
    origin: Uuid,
    state: AppState,
}

/// The shared channel all sessions on a device attach to.
///
/// Cloneable and cheap; each open session mints its own endpoint.
#[derive(Debug, Clone)]
pub struct StateChannel {
    tx: broadcast::Sender<Frame>,
}

impl StateChannel {
    /// Creates a channel retaining up to `capacity` frames per receiver.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        StateChannel { tx }
    }

    /// Mints an endpoint for one session. Each endpoint has its own
    /// origin id and receive cursor.
    pub fn endpoint(&self) -> BusEndpoint {
        BusEndpoint {
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
            origin: Uuid::new_v4(),
        }
    }
}

impl Default for StateChannel {
    fn default() -> Self {
        StateChannel::new(DEFAULT_CAPACITY)
    }
}

/// A session's attachment to the channel: publisher and subscriber in
/// one, with self-delivery filtered out by origin id.
#[derive(Debug)]
pub struct BusEndpoint {
    tx: broadcast::Sender<Frame>,
    rx: broadcast::Receiver<Frame>,
    origin: Uuid,
}

impl BusEndpoint {
    /// Waits for the next state published by another endpoint.
    ///
    /// Returns `None` only if the channel is gone, which in practice
    /// means the process is shutting down.
    pub async fn recv(&mut self) -> Option<AppState> {
        loop {
            match self.rx.recv().await {
                Ok(frame) if frame.origin != self.origin => return Some(frame.state),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Replication receiver lagged; dropped older broadcasts");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Bus for BusEndpoint {
    fn publish(&self, state: &AppState) {
        // The send only fails with zero receivers, and every endpoint
        // holds one; either way a broadcast has no delivery guarantee.
        let _ = self.tx.send(Frame {
            origin: self.origin,
            state: state.clone(),
        });
        debug!("Published state to replication bus");
    }

    fn try_latest(&mut self) -> Option<AppState> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(frame) => {
                    if frame.origin != self.origin {
                        latest = Some(frame.state);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Replication receiver lagged; dropped older broadcasts");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        latest
    }
}

// =============================================================================
// No-op Degradation
// =============================================================================

/// The degraded bus for runtimes without a usable channel: publishing
/// goes nowhere and nothing ever arrives. Data correctness within the
/// session is unaffected, so this is silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBus;

impl Bus for NoopBus {
    fn publish(&self, _state: &AppState) {}

    fn try_latest(&mut self) -> Option<AppState> {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_stock(stock: i64) -> AppState {
        let mut state = AppState::seed();
        state.menu[0].stock = stock;
        state
    }

    #[test]
    fn test_subscriber_sees_exactly_the_last_published_state() {
        let channel = StateChannel::default();
        let a = channel.endpoint();
        let mut b = channel.endpoint();

        a.publish(&state_with_stock(1));
        a.publish(&state_with_stock(2));

        // Full replacement with the newest broadcast, nothing merged.
        assert_eq!(b.try_latest().unwrap(), state_with_stock(2));
        // Nothing further pending.
        assert!(b.try_latest().is_none());
    }

    #[test]
    fn test_publisher_never_hears_itself() {
        let channel = StateChannel::default();
        let mut a = channel.endpoint();

        a.publish(&state_with_stock(1));
        assert!(a.try_latest().is_none());
    }

    #[test]
    fn test_fanout_reaches_every_other_endpoint() {
        let channel = StateChannel::default();
        let a = channel.endpoint();
        let mut b = channel.endpoint();
        let mut c = channel.endpoint();

        a.publish(&state_with_stock(7));

        assert_eq!(b.try_latest().unwrap(), state_with_stock(7));
        assert_eq!(c.try_latest().unwrap(), state_with_stock(7));
    }

    #[test]
    fn test_lagged_receiver_skips_to_newest() {
        let channel = StateChannel::new(2);
        let a = channel.endpoint();
        let mut b = channel.endpoint();

        for stock in 1..=10 {
            a.publish(&state_with_stock(stock));
        }

        // Frames 1..=8 were dropped by the bounded channel; the
        // receiver recovers and still lands on the newest state.
        assert_eq!(b.try_latest().unwrap(), state_with_stock(10));
    }

    #[test]
    fn test_noop_bus_degrades_silently() {
        let mut bus = NoopBus;
        bus.publish(&AppState::seed());
        assert!(bus.try_latest().is_none());
    }

    #[tokio::test]
    async fn test_async_recv_delivers_foreign_state() {
        let channel = StateChannel::default();
        let a = channel.endpoint();
        let mut b = channel.endpoint();

        a.publish(&state_with_stock(3));
        assert_eq!(b.recv().await.unwrap(), state_with_stock(3));
    }
}
