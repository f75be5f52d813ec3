//! # Error Types
//!
//! Validation errors for kasir-core.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError (this module)  ← transition rejected, state untouched  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kasir-session surfaces it as a user notice                             │
//! │                                                                         │
//! │  StoreError (kasir-store) is a separate family: persistence failures    │
//! │  are logged and swallowed, they never reject a transition.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Validation failures raised by cart operations and state transitions.
///
/// Every variant means the requested operation was a no-op: the caller
/// still holds the unchanged state and should show the message to the
/// operator as a notice, nothing more.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Checkout or park requested with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Add-to-cart on an item whose stock is already zero.
    #[error("'{name}' is out of stock")]
    OutOfStock { name: String },

    /// A menu id that does not exist in the catalog.
    #[error("menu item not found: {0}")]
    UnknownMenuItem(String),

    /// A pending order id that is not (or no longer) parked.
    ///
    /// ## When This Occurs
    /// - The order was already resumed (each parked order is consumed once)
    /// - Another session resumed it and the replicated state replaced ours
    #[error("pending order not found: {0}")]
    UnknownPendingOrder(String),

    /// Manual stock adjustments must add at least one unit.
    #[error("stock quantity must be positive, got {quantity}")]
    QuantityNotPositive { quantity: i64 },
}

/// Convenience type alias for Results with ValidationError.
pub type CoreResult<T> = Result<T, ValidationError>;
