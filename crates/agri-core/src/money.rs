//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  GST at 18% on ₹8,95,000 computed with floats:                         │
//! │    895000 * 0.18 = 161099.99999999997  ❌ WRONG!                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise + Basis Points                             │
//! │    89500000 paise * 1800 bps / 10000 = 16110000 paise = ₹1,61,100      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Display Convention
//! Storefront prices are shown as whole rupees (no paise) with Indian digit
//! grouping: `₹17,90,000`, not `₹1,790,000.00`.
//!
//! ## Usage
//! ```rust
//! use agri_core::money::Money;
//!
//! let tractor = Money::from_rupees(895_000);
//! let two = tractor * 2;
//! assert_eq!(two.rupees(), 1_790_000);
//! assert_eq!(two.to_string(), "₹17,90,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

/// Paise per rupee.
const PAISE_PER_RUPEE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of an Indian rupee).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price ──► CartItem.price ──► CartItem.line_total               │
/// │                                            │                            │
/// │                                            ▼                            │
/// │                      Cart.total ──► OrderTotals (GST, shipping, promo)  │
/// │                                            │                            │
/// │                                            ▼                            │
/// │                                 Displayed as "₹10,56,100"               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Catalog prices are quoted in whole rupees, so this is the usual
    /// entry point.
    ///
    /// ```rust
    /// use agri_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(5_000).paise(), 500_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee part, truncated toward zero.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the amount rounded to the nearest rupee, halves away from zero.
    ///
    /// This is the value the storefront displays.
    ///
    /// ```rust
    /// use agri_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(12_349).rounded_rupees(), 123);
    /// assert_eq!(Money::from_paise(12_350).rounded_rupees(), 124);
    /// assert_eq!(Money::from_paise(-12_350).rounded_rupees(), -124);
    /// ```
    pub const fn rounded_rupees(&self) -> i64 {
        let half = PAISE_PER_RUPEE / 2;
        if self.0 < 0 {
            -((-self.0 + half) / PAISE_PER_RUPEE)
        } else {
            (self.0 + half) / PAISE_PER_RUPEE
        }
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use agri_core::money::Money;
    ///
    /// let rotavator = Money::from_rupees(125_000);
    /// assert_eq!(rotavator.multiply_quantity(3).rupees(), 375_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `rate` of this amount, rounded to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math on i128: `(amount * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use agri_core::money::Money;
    /// use agri_core::types::Rate;
    ///
    /// let subtotal = Money::from_rupees(895_000);
    /// let gst = subtotal.percentage(Rate::from_bps(1800));
    /// assert_eq!(gst.rupees(), 161_100);
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let value = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(value as i64)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Groups digits the Indian way: the last three, then pairs.
///
/// `1790000` → `17,90,000`
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl Money {
    /// Integer-rounded rupees with Indian grouping behind `symbol`.
    ///
    /// ```rust
    /// use agri_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(1_056_100).format_with_symbol("Rs. "), "Rs. 10,56,100");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rupees = self.rounded_rupees();
        let sign = if rupees < 0 { "-" } else { "" };
        format!("{}{}{}", sign, symbol, group_indian(rupees.unsigned_abs()))
    }
}

/// Integer-rounded rupees with Indian grouping, e.g. `₹8,95,000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("₹"))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
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

/// Multiplication by quantity.
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees_and_paise() {
        let money = Money::from_rupees(895_000);
        assert_eq!(money.paise(), 89_500_000);
        assert_eq!(money.rupees(), 895_000);
        assert_eq!(Money::from_paise(199).rupees(), 1);
    }

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Money::from_rupees(0).to_string(), "₹0");
        assert_eq!(Money::from_rupees(999).to_string(), "₹999");
        assert_eq!(Money::from_rupees(5_000).to_string(), "₹5,000");
        assert_eq!(Money::from_rupees(50_000).to_string(), "₹50,000");
        assert_eq!(Money::from_rupees(100_000).to_string(), "₹1,00,000");
        assert_eq!(Money::from_rupees(1_790_000).to_string(), "₹17,90,000");
        assert_eq!(Money::from_rupees(123_456_789).to_string(), "₹12,34,56,789");
    }

    #[test]
    fn test_display_rounds_to_whole_rupees() {
        assert_eq!(Money::from_paise(12_349).to_string(), "₹123");
        assert_eq!(Money::from_paise(12_350).to_string(), "₹124");
        assert_eq!(Money::from_rupees(-5_000).to_string(), "-₹5,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(1_000);
        let b = Money::from_rupees(500);

        assert_eq!((a + b).rupees(), 1_500);
        assert_eq!((a - b).rupees(), 500);
        assert_eq!((a * 3).rupees(), 3_000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.rupees(), 2_000);
    }

    #[test]
    fn test_gst_percentage() {
        let subtotal = Money::from_rupees(895_000);
        assert_eq!(subtotal.percentage(Rate::from_bps(1800)).rupees(), 161_100);

        // 18% of ₹333 = ₹59.94
        let small = Money::from_rupees(333);
        assert_eq!(small.percentage(Rate::from_bps(1800)).paise(), 5_994);
    }

    #[test]
    fn test_min() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(20);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paise(1).is_positive());
        assert!(Money::from_paise(-1).is_negative());
    }
}
