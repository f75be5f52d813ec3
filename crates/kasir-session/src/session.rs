//! # Session Container
//!
//! The explicit state container for one open till.
//!
//! ## Commit Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Commit Discipline                                │
//! │                                                                         │
//! │  operation ──► engine (pure) ──► ValidationError?                       │
//! │                     │                  │                                │
//! │                     │                  └──► returned to caller,         │
//! │                     │                       state untouched             │
//! │                     ▼                                                   │
//! │  swap in the complete new AppState                                      │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  1. Store::save        failure logged, in-memory state stays            │
//! │                        authoritative, next mutation retries             │
//! │  2. Mirror::save_backup  always attempted, swallows its own failures    │
//! │  3. Bus::publish       fire-and-forget broadcast to peer sessions       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is session-private working state: it is never persisted,
//! mirrored, or broadcast, so two open tills can build different orders
//! against the same replicated catalog.

use tracing::{debug, info, warn};

use kasir_core::engine::{self, Effect};
use kasir_core::{AppState, Cart, Money, PaymentMethod, ValidationError};
use kasir_store::{Mirror, Store};
use kasir_sync::Bus;

use crate::export::{self, MenuRow, SalesRow, StockRow};

/// One open till session.
///
/// Owns the committed [`AppState`] and the private [`Cart`], holds the
/// three capabilities, and is the only place the state is swapped.
pub struct Session<S: Store, M: Mirror, B: Bus> {
    state: AppState,
    cart: Cart,
    store: S,
    mirror: M,
    bus: B,
}

impl<S: Store, M: Mirror, B: Bus> Session<S, M, B> {
    /// Opens a session, recovering state in fallback order.
    ///
    /// ## Startup Fallback Chain
    /// 1. Durable store snapshot, when present
    /// 2. First run (store empty): the seed catalog
    /// 3. Store unavailable or corrupt: the backup mirror
    /// 4. No usable backup either: the seed catalog
    ///
    /// Never fails: persistence problems degrade to in-memory operation
    /// on the best state recoverable.
    pub async fn open(store: S, mirror: M, bus: B) -> Self {
        let state = match store.load().await {
            Ok(Some(state)) => {
                info!(
                    menu = state.menu.len(),
                    sales = state.sales.len(),
                    "Session opened from durable store"
                );
                state
            }
            Ok(None) => {
                info!("First run, starting from the seed catalog");
                AppState::seed()
            }
            Err(e) => {
                warn!(error = %e, "Durable store unavailable, consulting backup mirror");
                match mirror.load_backup() {
                    Some(state) => {
                        info!("Session recovered from backup mirror");
                        state
                    }
                    None => {
                        warn!("No usable backup, starting from the seed catalog");
                        AppState::seed()
                    }
                }
            }
        };

        Session {
            state,
            cart: Cart::new(),
            store,
            mirror,
            bus,
        }
    }

    /// The committed application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// This session's private cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    // =========================================================================
    // Cart Operations (no commit: the cart is not application state)
    // =========================================================================

    /// Adds one unit of a menu item to the cart.
    ///
    /// Fails with [`ValidationError::UnknownMenuItem`] for a bad id and
    /// [`ValidationError::OutOfStock`] for a sold-out item; either way
    /// the notice goes to the operator and nothing changes.
    pub fn add_to_cart(&mut self, menu_id: &str) -> Result<(), ValidationError> {
        let item = self
            .state
            .find_menu_item(menu_id)
            .ok_or_else(|| ValidationError::UnknownMenuItem(menu_id.to_string()))?
            .clone();
        self.cart.add_item(&item)
    }

    /// Adjusts the quantity of the cart line at `index` by `delta`,
    /// clamped at zero; a line reaching zero is removed.
    pub fn change_cart_quantity(&mut self, index: usize, delta: i64) {
        self.cart.change_quantity(index, delta);
    }

    /// Sets the customer note carried onto the invoice or parked order.
    pub fn set_note(&mut self, note: Option<String>) {
        self.cart.note = note;
    }

    /// Sets the table number carried onto the invoice or parked order.
    pub fn set_table(&mut self, table: Option<String>) {
        self.cart.table = table;
    }

    // =========================================================================
    // State Transitions (commit pipeline on success)
    // =========================================================================

    /// Parks the active cart as a pending order and clears the cart.
    ///
    /// Returns the parked order's id for later resumption.
    pub async fn park_order(&mut self) -> Result<String, ValidationError> {
        let outcome = engine::park_order(&self.state, &self.cart, chrono::Utc::now())?;
        self.commit(outcome.state).await;
        self.cart.clear();
        info!(order_id = %outcome.order_id, "Order parked");
        Ok(outcome.order_id)
    }

    /// Resumes a parked order into the active cart, consuming it.
    ///
    /// The captured lines replace the cart's lines; note and table are
    /// not restored.
    pub async fn resume_order(&mut self, pending_id: &str) -> Result<(), ValidationError> {
        let outcome = engine::resume_order(&self.state, pending_id)?;
        self.commit(outcome.state).await;
        self.cart.load_lines(outcome.cart_lines);
        info!(order_id = %pending_id, "Order resumed");
        Ok(())
    }

    /// Adds stock to a menu item and records one `in` ledger entry.
    pub async fn add_stock(
        &mut self,
        menu_id: &str,
        quantity: i64,
        note: &str,
    ) -> Result<(), ValidationError> {
        let next = engine::add_stock(&self.state, menu_id, quantity, note, chrono::Utc::now())?;
        self.commit(next).await;
        Ok(())
    }

    /// Checks out the active cart.
    ///
    /// On success the cart is cleared and the returned
    /// [`Effect::PrintReceipt`] carries the new invoice for the printing
    /// collaborator. The session does not depend on print success.
    pub async fn checkout(
        &mut self,
        payment: Money,
        method: PaymentMethod,
    ) -> Result<Effect, ValidationError> {
        let outcome = engine::checkout(&self.state, &self.cart, payment, method, chrono::Utc::now())?;
        let effect = outcome.effect();
        info!(
            invoice = %outcome.invoice.id,
            total = %outcome.invoice.total,
            "Checkout committed"
        );
        self.commit(outcome.state).await;
        self.cart.clear();
        Ok(effect)
    }

    // =========================================================================
    // Replication
    // =========================================================================

    /// Applies the newest state broadcast by a peer session, if any
    /// arrived since the last poll.
    ///
    /// The foreign state replaces the local state wholesale; nothing is
    /// merged and the private cart is untouched. Returns whether a
    /// replacement happened.
    pub fn sync_from_peers(&mut self) -> bool {
        match self.bus.try_latest() {
            Some(state) => {
                debug!("Applying replicated state from peer session");
                self.state = state;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Clears everything: durable store, backup mirror, and the
    /// in-memory state, which returns to the seed catalog.
    ///
    /// Not broadcast: peer sessions keep their in-memory state until
    /// their own next mutation overwrites the cleared store.
    pub async fn reset(&mut self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Durable store clear failed during reset");
        }
        self.mirror.clear();
        self.state = AppState::seed();
        self.cart.clear();
        info!("Session reset to seed catalog");
    }

    // =========================================================================
    // Export Collaborator
    // =========================================================================

    /// The sales ledger flattened into spreadsheet rows.
    pub fn sales_rows(&self) -> Vec<SalesRow> {
        export::sales_rows(&self.state)
    }

    /// The stock ledger flattened into spreadsheet rows.
    pub fn stock_rows(&self) -> Vec<StockRow> {
        export::stock_rows(&self.state)
    }

    /// The catalog flattened into spreadsheet rows.
    pub fn menu_rows(&self) -> Vec<MenuRow> {
        export::menu_rows(&self.state)
    }

    // =========================================================================
    // Commit Pipeline
    // =========================================================================

    /// Swaps in the accepted new state and runs the commit pipeline:
    /// durable save, mirror backup, broadcast.
    async fn commit(&mut self, next: AppState) {
        self.state = next;

        if let Err(e) = self.store.save(&self.state).await {
            // In-memory state stays authoritative; the next mutation's
            // save naturally retries.
            warn!(error = %e, "Durable save failed, continuing on in-memory state");
        }
        self.mirror.save_backup(&self.state);
        self.bus.publish(&self.state);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
