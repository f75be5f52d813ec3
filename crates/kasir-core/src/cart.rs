//! # Cart
//!
//! The in-progress order for one open session.
//!
//! The cart is working state, not application state: it is never
//! persisted, mirrored, or broadcast. Two tills on the same device each
//! hold their own cart while sharing one replicated `AppState`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::MenuItem;

/// A line in the in-progress order.
///
/// Name and unit price are snapshotted from the menu when the line is
/// created, so a price edit mid-order does not change what the customer
/// was quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Menu id of the item.
    pub menu_id: String,
    /// Name at time of adding (frozen).
    pub name: String,
    /// Unit price at time of adding (frozen).
    pub unit_price: Money,
    /// Quantity, always >= 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// Line total at the snapshot price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The active cart plus its order metadata.
///
/// ## Invariants
/// - Lines are unique by `menu_id` (adding the same item again bumps
///   the quantity); checkout relies on this for its one-ledger-entry-
///   per-menu-id guarantee.
/// - A line's quantity never drops below 1: reaching 0 removes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    /// The order lines.
    pub lines: Vec<CartLine>,
    /// Customer note carried onto the invoice or parked order.
    pub note: Option<String>,
    /// Table number carried onto the invoice or parked order.
    pub table: Option<String>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a menu item to the cart.
    ///
    /// Rejects items that are already out of stock; otherwise merges
    /// into an existing line or appends a new snapshot line.
    pub fn add_item(&mut self, item: &MenuItem) -> Result<(), ValidationError> {
        if item.stock <= 0 {
            return Err(ValidationError::OutOfStock {
                name: item.name.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_id == item.id) {
            line.quantity += 1;
            return Ok(());
        }

        self.lines.push(CartLine {
            menu_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
        });
        Ok(())
    }

    /// Adjusts the quantity of the line at `index` by `delta`.
    ///
    /// The result is clamped at 0 and a line reaching 0 is removed.
    /// An out-of-range index is a silent no-op.
    pub fn change_quantity(&mut self, index: usize, delta: i64) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = (line.quantity + delta).max(0);
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// Replaces the lines with those of a resumed order.
    pub fn load_lines(&mut self, lines: Vec<CartLine>) {
        self.lines = lines;
    }

    /// Sum of line totals at snapshot prices.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Checks whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clears lines, note, and table after a successful checkout or park.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.note = None;
        self.table = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppState;

    fn seed_item(id: &str) -> MenuItem {
        AppState::seed().find_menu_item(id).unwrap().clone()
    }

    #[test]
    fn test_add_item_snapshots_price_and_name() {
        let mut cart = Cart::new();
        cart.add_item(&seed_item("m1")).unwrap();

        assert_eq!(cart.lines.len(), 1);
        let line = &cart.lines[0];
        assert_eq!(line.menu_id, "m1");
        assert_eq!(line.name, "Ayam Goreng");
        assert_eq!(line.unit_price, Money::from_rupiah(10_000));
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_add_same_item_merges_quantity() {
        let mut cart = Cart::new();
        let m1 = seed_item("m1");
        cart.add_item(&m1).unwrap();
        cart.add_item(&m1).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.subtotal(), Money::from_rupiah(20_000));
    }

    #[test]
    fn test_add_out_of_stock_item_is_rejected() {
        let mut cart = Cart::new();
        let mut m1 = seed_item("m1");
        m1.stock = 0;

        let err = cart.add_item(&m1).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_clamps_and_removes() {
        let mut cart = Cart::new();
        cart.add_item(&seed_item("m1")).unwrap();
        cart.add_item(&seed_item("m3")).unwrap();

        cart.change_quantity(0, 2);
        assert_eq!(cart.lines[0].quantity, 3);

        // Dropping far below zero clamps to zero and removes the line.
        cart.change_quantity(0, -10);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].menu_id, "m3");
    }

    #[test]
    fn test_change_quantity_out_of_range_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&seed_item("m1")).unwrap();
        cart.change_quantity(5, 1);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_clear_resets_note_and_table() {
        let mut cart = Cart::new();
        cart.add_item(&seed_item("m1")).unwrap();
        cart.note = Some("tanpa sambal".to_string());
        cart.table = Some("4".to_string());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.note, None);
        assert_eq!(cart.table, None);
    }
}
