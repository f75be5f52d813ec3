//! # Domain Types
//!
//! The entities that make up the persisted application state.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            AppState                                     │
//! │                                                                         │
//! │  ┌──────────────┐  ┌───────────────┐  ┌─────────────┐  ┌────────────┐  │
//! │  │ menu         │  │ sales         │  │ stockHistory│  │ pending    │  │
//! │  │ Vec<MenuItem>│  │ Vec<Sale-     │  │ Vec<Stock-  │  │ Vec<Pend-  │  │
//! │  │ (mutable,    │  │    Invoice>   │  │    Entry>   │  │ ingOrder>  │  │
//! │  │  in place)   │  │ (append-only, │  │ (append-only│  │ (consumed  │  │
//! │  │              │  │  newest first)│  │ newest first│  │  on resume)│  │
//! │  └──────────────┘  └───────────────┘  └─────────────┘  └────────────┘  │
//! │                                                                         │
//! │  AppState is the sole unit of persistence and replication. It is       │
//! │  saved, mirrored, and broadcast whole; it is never merged.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sale lines and parked order lines copy id, name, and unit price out of
//! the menu at the moment they are created. Editing the menu later must
//! never rewrite history, so historical records hold values, not references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier, immutable once created.
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Selling price per unit.
    pub price: Money,

    /// Estimated cost per unit, for margin reporting.
    pub cost: Money,

    /// Current stock level. Never negative: checkout floors at zero and
    /// restocking only adds.
    pub stock: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Physical cash.
    Tunai,
    /// QR-code transfer.
    #[serde(rename = "QRIS")]
    Qris,
    /// Bank transfer.
    Transfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Tunai => write!(f, "Tunai"),
            PaymentMethod::Qris => write!(f, "QRIS"),
            PaymentMethod::Transfer => write!(f, "Transfer"),
        }
    }
}

// =============================================================================
// Sale Invoice
// =============================================================================

/// A line item in a completed sale.
///
/// Uses the snapshot pattern: name and unit price are frozen at the
/// moment the item entered the cart, independent of later menu edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Menu id of the sold item (back-reference by value, not ownership).
    pub menu_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// Quantity sold.
    pub quantity: i64,
}

impl SaleLine {
    /// Line total at the recorded sale-time price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// An immutable record of a completed checkout.
///
/// Append-only: once created it is never edited. Its total always equals
/// the sum of its line totals at the prices recorded at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInvoice {
    /// Invoice id, `INV-<epoch millis>`. Monotonic per device clock.
    pub id: String,
    /// When the checkout was committed.
    pub timestamp: DateTime<Utc>,
    /// The sold lines, snapshotted from the cart.
    pub items: Vec<SaleLine>,
    /// Sum of line totals before any adjustment (always equal to `total`;
    /// kept as its own field because the receipt shows both).
    pub subtotal: Money,
    /// Amount charged.
    pub total: Money,
    /// Amount the customer handed over.
    pub payment: Money,
    /// How the sale was paid.
    pub method: PaymentMethod,
    /// Free-text customer note, if any.
    pub note: Option<String>,
    /// Table number, if dine-in.
    pub table: Option<String>,
}

impl SaleInvoice {
    /// Change due back to the customer.
    #[inline]
    pub fn change(&self) -> Money {
        self.payment - self.total
    }
}

// =============================================================================
// Stock History
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    /// Replenishment (manual restock).
    In,
    /// Depletion (sold at checkout).
    Out,
}

impl fmt::Display for StockDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockDirection::In => write!(f, "in"),
            StockDirection::Out => write!(f, "out"),
        }
    }
}

/// An immutable ledger entry for one stock change.
///
/// Every checkout writes exactly one `Out` entry per distinct sold menu
/// id, and every manual replenishment writes exactly one `In` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Entry id: `SH-<epoch millis>` for restocks,
    /// `SH-<epoch millis>-<menu id>` for checkout depletions.
    pub id: String,
    /// When the movement happened.
    pub timestamp: DateTime<Utc>,
    /// Menu id this movement applies to (lookup/join only).
    pub menu_id: String,
    /// Menu name at the time of the movement (frozen for display).
    pub menu_name: String,
    /// Movement direction.
    pub direction: StockDirection,
    /// Units moved, always positive.
    pub quantity: i64,
    /// Free-text reason. Checkout entries reference the invoice id.
    pub note: String,
}

// =============================================================================
// Pending Order
// =============================================================================

/// A cart parked for later resumption.
///
/// Lifecycle: created by parking, destroyed by resuming. Exactly one
/// resume consumes it; there are no other transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Order id, `P-<epoch millis>`.
    pub id: String,
    /// Captured cart lines (same snapshot shape as the live cart).
    pub items: Vec<crate::cart::CartLine>,
    /// When the order was parked.
    pub timestamp: DateTime<Utc>,
    /// Customer note captured from the cart.
    pub note: Option<String>,
    /// Table number captured from the cart.
    pub table: Option<String>,
}

// =============================================================================
// App State
// =============================================================================

/// The single aggregate of menu, sales, stock history, and pending
/// orders. Persisted, mirrored, and replicated as one unit.
///
/// The in-progress cart is deliberately NOT part of this aggregate:
/// each open session keeps its own private cart so that two tills can
/// build different orders at once (see kasir-session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// The catalog. Mutated in place only by stock-changing transitions.
    pub menu: Vec<MenuItem>,
    /// Sales ledger, newest first.
    pub sales: Vec<SaleInvoice>,
    /// Stock movement ledger, newest first.
    pub stock_history: Vec<StockEntry>,
    /// Parked orders, newest first.
    pub pending: Vec<PendingOrder>,
}

impl AppState {
    /// The seed catalog used on first run and after a reset.
    pub fn seed() -> Self {
        let menu = vec![
            menu_item("m1", "Ayam Goreng", 10_000, 6_000, 32),
            menu_item("m2", "Ayam Goreng Jumbo", 19_000, 11_000, 12),
            menu_item("m3", "Es Teh", 5_000, 1_500, 120),
            menu_item("m4", "Nila Bakar", 27_000, 15_000, 8),
            menu_item("m5", "Gurame Goreng", 35_000, 20_000, 5),
            menu_item("m6", "Tempe Mendoan", 8_000, 3_000, 20),
        ];
        AppState {
            menu,
            sales: Vec::new(),
            stock_history: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Looks up a menu item by id.
    pub fn find_menu_item(&self, menu_id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|m| m.id == menu_id)
    }
}

fn menu_item(id: &str, name: &str, price: i64, cost: i64, stock: i64) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_rupiah(price),
        cost: Money::from_rupiah(cost),
        stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let state = AppState::seed();
        assert_eq!(state.menu.len(), 6);
        assert!(state.sales.is_empty());
        assert!(state.stock_history.is_empty());
        assert!(state.pending.is_empty());

        let m1 = state.find_menu_item("m1").unwrap();
        assert_eq!(m1.name, "Ayam Goreng");
        assert_eq!(m1.price, Money::from_rupiah(10_000));
        assert_eq!(m1.stock, 32);
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Tunai).unwrap(),
            "\"Tunai\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Qris).unwrap(),
            "\"QRIS\""
        );
        assert_eq!(PaymentMethod::Transfer.to_string(), "Transfer");
    }

    #[test]
    fn test_stock_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&StockDirection::In).unwrap(),
            "\"in\""
        );
        assert_eq!(
            serde_json::to_string(&StockDirection::Out).unwrap(),
            "\"out\""
        );
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = AppState::seed();
        let json = serde_json::to_string(&state).unwrap();
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_invoice_change() {
        let invoice = SaleInvoice {
            id: "INV-1".to_string(),
            timestamp: Utc::now(),
            items: vec![],
            subtotal: Money::from_rupiah(18_000),
            total: Money::from_rupiah(18_000),
            payment: Money::from_rupiah(20_000),
            method: PaymentMethod::Tunai,
            note: None,
            table: None,
        };
        assert_eq!(invoice.change(), Money::from_rupiah(2_000));
    }
}
