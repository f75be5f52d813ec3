//! # Transaction Engine
//!
//! Pure state transitions over the `AppState` aggregate.
//!
//! ## Transition Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Transition Discipline                              │
//! │                                                                         │
//! │  (current AppState, params, now)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate ── ValidationError ──► caller keeps the old state untouched   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build a COMPLETE new AppState value                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  outcome { state', ... } + optional Effect for the caller to perform    │
//! │                                                                         │
//! │  No I/O, no clock reads, no partial mutation. The session container     │
//! │  is the only place the new state replaces the old one.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Side effects are values here: checkout does not print a receipt, it
//! returns an [`Effect::PrintReceipt`] request for the caller.

use chrono::{DateTime, Utc};

use crate::cart::{Cart, CartLine};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    AppState, PaymentMethod, PendingOrder, SaleInvoice, SaleLine, StockDirection, StockEntry,
};

// =============================================================================
// Effects
// =============================================================================

/// A side effect requested by a transition, performed by the caller
/// after the new state has been committed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand this invoice to the receipt-printing collaborator. The core
    /// does not depend on whether printing succeeds.
    PrintReceipt(SaleInvoice),
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of parking the active cart.
#[derive(Debug, Clone)]
pub struct ParkOutcome {
    /// The state with the new pending order prepended.
    pub state: AppState,
    /// Id of the parked order, for later resumption.
    pub order_id: String,
}

/// Result of resuming a parked order.
#[derive(Debug, Clone)]
pub struct ResumeOutcome {
    /// The state with the pending order removed.
    pub state: AppState,
    /// The captured lines, to be loaded into the active cart.
    pub cart_lines: Vec<CartLine>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The state with stock decremented and both ledgers extended.
    pub state: AppState,
    /// The newly created invoice.
    pub invoice: SaleInvoice,
}

impl CheckoutOutcome {
    /// The print request for the caller to pass along.
    pub fn effect(&self) -> Effect {
        Effect::PrintReceipt(self.invoice.clone())
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Parks the active cart as a pending order.
///
/// Fails with [`ValidationError::EmptyCart`] if there is nothing to
/// park. The new order captures lines, note, and table, and is
/// prepended to `pending` (newest first).
pub fn park_order(
    state: &AppState,
    cart: &Cart,
    now: DateTime<Utc>,
) -> Result<ParkOutcome, ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let order = PendingOrder {
        id: format!("P-{}", now.timestamp_millis()),
        items: cart.lines.clone(),
        timestamp: now,
        note: cart.note.clone(),
        table: cart.table.clone(),
    };
    let order_id = order.id.clone();

    let mut next = state.clone();
    next.pending.insert(0, order);

    Ok(ParkOutcome {
        state: next,
        order_id,
    })
}

/// Resumes a parked order, consuming it.
///
/// Fails with [`ValidationError::UnknownPendingOrder`] when the id is
/// not parked (already resumed, or resumed by a peer session whose
/// broadcast replaced our state). Exactly one order is removed per
/// successful call; the captured note/table are not restored.
pub fn resume_order(state: &AppState, pending_id: &str) -> Result<ResumeOutcome, ValidationError> {
    let order = state
        .pending
        .iter()
        .find(|p| p.id == pending_id)
        .ok_or_else(|| ValidationError::UnknownPendingOrder(pending_id.to_string()))?;

    let cart_lines = order.items.clone();

    let mut next = state.clone();
    next.pending.retain(|p| p.id != pending_id);

    Ok(ResumeOutcome {
        state: next,
        cart_lines,
    })
}

/// Adds stock to a menu item and records one `in` ledger entry.
///
/// Fails for non-positive quantities and unknown menu ids.
pub fn add_stock(
    state: &AppState,
    menu_id: &str,
    quantity: i64,
    note: &str,
    now: DateTime<Utc>,
) -> Result<AppState, ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::QuantityNotPositive { quantity });
    }

    let item = state
        .find_menu_item(menu_id)
        .ok_or_else(|| ValidationError::UnknownMenuItem(menu_id.to_string()))?;

    let entry = StockEntry {
        id: format!("SH-{}", now.timestamp_millis()),
        timestamp: now,
        menu_id: menu_id.to_string(),
        menu_name: item.name.clone(),
        direction: StockDirection::In,
        quantity,
        note: note.to_string(),
    };

    let mut next = state.clone();
    for m in &mut next.menu {
        if m.id == menu_id {
            m.stock += quantity;
        }
    }
    next.stock_history.insert(0, entry);

    Ok(next)
}

/// Checks out the active cart.
///
/// On success the new state carries:
/// - stock decremented per sold line, floored at zero (oversell on a
///   stale replicated read clamps rather than rejects; the payment has
///   already been taken at the till, so a hard failure would be worse
///   than an inventory correction),
/// - exactly one new [`SaleInvoice`] prepended to `sales`, whose total
///   is the sum of line totals at cart-snapshot prices,
/// - exactly one `out` [`StockEntry`] per cart line (lines are unique
///   by menu id) prepended to `stock_history`, each noting the invoice.
///
/// The caller clears its cart and performs [`CheckoutOutcome::effect`]
/// only after committing the new state.
pub fn checkout(
    state: &AppState,
    cart: &Cart,
    payment: Money,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> Result<CheckoutOutcome, ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let millis = now.timestamp_millis();
    let invoice_id = format!("INV-{}", millis);

    let items: Vec<SaleLine> = cart
        .lines
        .iter()
        .map(|line| SaleLine {
            menu_id: line.menu_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        })
        .collect();
    let total: Money = items.iter().map(SaleLine::line_total).sum();

    let invoice = SaleInvoice {
        id: invoice_id.clone(),
        timestamp: now,
        items,
        subtotal: total,
        total,
        payment,
        method,
        note: cart.note.clone(),
        table: cart.table.clone(),
    };

    let mut next = state.clone();
    for m in &mut next.menu {
        if let Some(line) = cart.lines.iter().find(|l| l.menu_id == m.id) {
            m.stock = (m.stock - line.quantity).max(0);
        }
    }

    let depletions: Vec<StockEntry> = cart
        .lines
        .iter()
        .map(|line| StockEntry {
            id: format!("SH-{}-{}", millis, line.menu_id),
            timestamp: now,
            menu_id: line.menu_id.clone(),
            menu_name: state
                .find_menu_item(&line.menu_id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| line.name.clone()),
            direction: StockDirection::Out,
            quantity: line.quantity,
            note: format!("Terjual ({})", invoice_id),
        })
        .collect();

    next.sales.insert(0, invoice.clone());
    next.stock_history.splice(0..0, depletions);

    Ok(CheckoutOutcome {
        state: next,
        invoice,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap()
    }

    fn cart_with(state: &AppState, picks: &[(&str, i64)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in picks {
            let item = state.find_menu_item(id).unwrap().clone();
            for _ in 0..*qty {
                cart.add_item(&item).unwrap();
            }
        }
        cart
    }

    #[test]
    fn test_checkout_scenario_from_seed() {
        // m1 at Rp10.000, stock 32; two units checked out with Tunai.
        let state = AppState::seed();
        let cart = cart_with(&state, &[("m1", 2)]);

        let outcome = checkout(
            &state,
            &cart,
            Money::from_rupiah(20_000),
            PaymentMethod::Tunai,
            now(),
        )
        .unwrap();

        let invoice = &outcome.invoice;
        assert_eq!(invoice.total, Money::from_rupiah(20_000));
        assert_eq!(invoice.subtotal, Money::from_rupiah(20_000));
        assert_eq!(invoice.method, PaymentMethod::Tunai);
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity, 2);

        let next = &outcome.state;
        assert_eq!(next.find_menu_item("m1").unwrap().stock, 30);
        assert_eq!(next.sales.len(), 1);
        assert_eq!(next.sales[0], *invoice);

        assert_eq!(next.stock_history.len(), 1);
        let entry = &next.stock_history[0];
        assert_eq!(entry.menu_id, "m1");
        assert_eq!(entry.direction, StockDirection::Out);
        assert_eq!(entry.quantity, 2);
        assert!(entry.note.contains(&invoice.id));
    }

    #[test]
    fn test_checkout_one_out_entry_per_distinct_menu_id() {
        let state = AppState::seed();
        let cart = cart_with(&state, &[("m1", 2), ("m3", 1), ("m6", 3)]);

        let outcome = checkout(
            &state,
            &cart,
            cart.subtotal(),
            PaymentMethod::Qris,
            now(),
        )
        .unwrap();

        assert_eq!(outcome.state.stock_history.len(), 3);
        let mut ids: Vec<&str> = outcome
            .state
            .stock_history
            .iter()
            .map(|e| e.menu_id.as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["m1", "m3", "m6"]);
    }

    #[test]
    fn test_checkout_total_is_sum_of_snapshot_prices() {
        let mut state = AppState::seed();
        let cart = cart_with(&state, &[("m1", 2), ("m4", 1)]);

        // A price hike after the items entered the cart must not change
        // what the customer pays.
        for m in &mut state.menu {
            if m.id == "m1" {
                m.price = Money::from_rupiah(99_000);
            }
        }

        let outcome = checkout(
            &state,
            &cart,
            Money::from_rupiah(47_000),
            PaymentMethod::Tunai,
            now(),
        )
        .unwrap();

        assert_eq!(outcome.invoice.total, Money::from_rupiah(2 * 10_000 + 27_000));
    }

    #[test]
    fn test_checkout_empty_cart_changes_nothing() {
        let state = AppState::seed();
        let err = checkout(
            &state,
            &Cart::new(),
            Money::zero(),
            PaymentMethod::Tunai,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCart));
    }

    #[test]
    fn test_checkout_floors_stock_at_zero() {
        // Gurame Goreng has stock 5; a stale cart sells 8. Stock clamps
        // to 0 instead of going negative.
        let state = AppState::seed();
        let mut cart = Cart::new();
        let m5 = state.find_menu_item("m5").unwrap().clone();
        cart.add_item(&m5).unwrap();
        cart.lines[0].quantity = 8;

        let outcome = checkout(
            &state,
            &cart,
            cart.subtotal(),
            PaymentMethod::Tunai,
            now(),
        )
        .unwrap();

        assert_eq!(outcome.state.find_menu_item("m5").unwrap().stock, 0);
        // The ledger still records what was sold, not what was clamped.
        assert_eq!(outcome.state.stock_history[0].quantity, 8);
    }

    #[test]
    fn test_stock_never_negative_across_mixed_operations() {
        let mut state = AppState::seed();
        let when = now();

        for round in 0..10 {
            let item = state.find_menu_item("m5").unwrap().clone();
            let mut cart = Cart::new();
            // Once stock runs out, add_item refuses and the round skips
            // the sale, exactly like the till would.
            if cart.add_item(&item).is_ok() {
                state = checkout(&state, &cart, cart.subtotal(), PaymentMethod::Tunai, when)
                    .unwrap()
                    .state;
            }
            if round % 3 == 0 {
                state = add_stock(&state, "m5", 2, "restock", when).unwrap();
            }
            assert!(state.menu.iter().all(|m| m.stock >= 0));
        }
    }

    #[test]
    fn test_add_stock_scenario() {
        let state = AppState::seed();
        let before = state.find_menu_item("m2").unwrap().stock;

        let next = add_stock(&state, "m2", 5, "restock", now()).unwrap();

        assert_eq!(next.find_menu_item("m2").unwrap().stock, before + 5);
        assert_eq!(next.stock_history.len(), 1);
        let entry = &next.stock_history[0];
        assert_eq!(entry.direction, StockDirection::In);
        assert_eq!(entry.quantity, 5);
        assert_eq!(entry.note, "restock");
    }

    #[test]
    fn test_add_stock_rejects_bad_input() {
        let state = AppState::seed();

        assert!(matches!(
            add_stock(&state, "m1", 0, "x", now()).unwrap_err(),
            ValidationError::QuantityNotPositive { quantity: 0 }
        ));
        assert!(matches!(
            add_stock(&state, "m1", -3, "x", now()).unwrap_err(),
            ValidationError::QuantityNotPositive { .. }
        ));
        assert!(matches!(
            add_stock(&state, "nope", 5, "x", now()).unwrap_err(),
            ValidationError::UnknownMenuItem(_)
        ));
    }

    #[test]
    fn test_park_then_resume_round_trips_the_cart() {
        let state = AppState::seed();
        let mut cart = cart_with(&state, &[("m1", 2), ("m3", 1)]);
        cart.note = Some("pedas".to_string());
        cart.table = Some("7".to_string());
        let lines_before = cart.lines.clone();
        let pending_before = state.pending.clone();

        let parked = park_order(&state, &cart, now()).unwrap();
        assert_eq!(parked.state.pending.len(), 1);
        assert_eq!(parked.state.pending[0].note.as_deref(), Some("pedas"));

        let resumed = resume_order(&parked.state, &parked.order_id).unwrap();
        assert_eq!(resumed.cart_lines, lines_before);
        assert_eq!(resumed.state.pending, pending_before);
    }

    #[test]
    fn test_park_empty_cart_is_rejected() {
        let state = AppState::seed();
        let err = park_order(&state, &Cart::new(), now()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCart));
    }

    #[test]
    fn test_resume_unknown_id_leaves_state_unchanged() {
        let state = AppState::seed();
        let err = resume_order(&state, "P-404").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownPendingOrder(_)));
    }

    #[test]
    fn test_resume_consumes_the_order_exactly_once() {
        let state = AppState::seed();
        let cart = cart_with(&state, &[("m6", 1)]);

        let parked = park_order(&state, &cart, now()).unwrap();
        let resumed = resume_order(&parked.state, &parked.order_id).unwrap();

        // A second resume of the same id must fail.
        assert!(matches!(
            resume_order(&resumed.state, &parked.order_id).unwrap_err(),
            ValidationError::UnknownPendingOrder(_)
        ));
    }

    #[test]
    fn test_checkout_effect_carries_the_invoice() {
        let state = AppState::seed();
        let cart = cart_with(&state, &[("m1", 1)]);

        let outcome = checkout(
            &state,
            &cart,
            Money::from_rupiah(10_000),
            PaymentMethod::Tunai,
            now(),
        )
        .unwrap();

        let Effect::PrintReceipt(invoice) = outcome.effect();
        assert_eq!(invoice, outcome.invoice);
    }

    #[test]
    fn test_transitions_do_not_mutate_the_input_state() {
        let state = AppState::seed();
        let snapshot = state.clone();
        let cart = cart_with(&state, &[("m1", 1)]);

        let _ = checkout(&state, &cart, cart.subtotal(), PaymentMethod::Tunai, now()).unwrap();
        let _ = add_stock(&state, "m1", 3, "restock", now()).unwrap();
        let _ = park_order(&state, &cart, now()).unwrap();

        assert_eq!(state, snapshot);
    }
}
