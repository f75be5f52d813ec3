//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004                    │
//! │                                                                         │
//! │  OUR SOLUTION: whole integer rupiah (i64)                               │
//! │    The catalog is priced in IDR, which has no fractional unit in        │
//! │    practice, so one unit of Money is exactly one rupiah.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_rupiah(10_000);
//! let line_total = price * 2;
//! assert_eq!(line_total.rupiah(), 20_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: margin reports can legitimately go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: persists as a plain JSON number
///
/// Every monetary value in the system flows through this type: menu
/// prices and costs, cart line snapshots, invoice totals, payments,
/// and report aggregates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (possible for profit figures).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, for line totals.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(5_000);
    /// assert_eq!(unit_price.multiply_quantity(3).rupiah(), 15_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Display implementation shows rupiah with dot grouping, e.g. `Rp10.000`.
///
/// This is for logs and debugging. Receipt rendering lives with the
/// printing collaborator, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Groups digits in threes with `.` separators, Indonesian style.
fn group_thousands(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    while value > 0 {
        parts.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    let mut out = parts.pop().expect("at least one group");
    // The most significant group keeps no leading zeros.
    out = out.trim_start_matches('0').to_string();
    for part in parts.into_iter().rev() {
        out.push('.');
        out.push_str(&part);
    }
    out
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(10_000);
        assert_eq!(money.rupiah(), 10_000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::from_rupiah(0)), "Rp0");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp500");
        assert_eq!(format!("{}", Money::from_rupiah(10_000)), "Rp10.000");
        assert_eq!(format!("{}", Money::from_rupiah(1_234_567)), "Rp1.234.567");
        assert_eq!(format!("{}", Money::from_rupiah(-5_000)), "-Rp5.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(4_000);

        assert_eq!((a + b).rupiah(), 14_000);
        assert_eq!((a - b).rupiah(), 6_000);
        assert_eq!((a * 3).rupiah(), 30_000);
        assert_eq!(a.multiply_quantity(2).rupiah(), 20_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1_000, 2_000, 3_000]
            .into_iter()
            .map(Money::from_rupiah)
            .sum();
        assert_eq!(total.rupiah(), 6_000);
    }

    #[test]
    fn test_negative_profit_is_representable() {
        let profit = Money::from_rupiah(5_000) - Money::from_rupiah(8_000);
        assert!(profit.is_negative());
        assert_eq!(profit.rupiah(), -3_000);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_rupiah(27_000)).unwrap();
        assert_eq!(json, "27000");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_rupiah(27_000));
    }
}
