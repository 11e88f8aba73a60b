//! # Promo Codes
//!
//! The coupon table and how a coupon affects an order.
//!
//! | Code       | Effect              | Minimum subtotal |
//! |------------|---------------------|------------------|
//! | `SAVE10`   | 10% off             | ₹1,00,000        |
//! | `FIRSTBUY` | ₹5,000 off          | ₹50,000          |
//! | `FREESHIP` | Free shipping       | none             |
//!
//! Codes match case-insensitively after trimming. A coupon stays applied even
//! when the cart later drops below its minimum; it then simply contributes
//! nothing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Rate;

/// What a coupon does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum CouponKind {
    /// Percentage off the subtotal.
    Percent(Rate),
    /// Fixed amount off the subtotal.
    Flat(Money),
    /// Shipping fee waived.
    FreeShipping,
}

/// A redeemable promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Coupon {
    pub code: String,
    pub description: String,
    pub kind: CouponKind,
    pub min_subtotal: Money,
}

impl Coupon {
    /// Checks if `subtotal` reaches the coupon minimum.
    pub fn is_eligible(&self, subtotal: Money) -> bool {
        subtotal >= self.min_subtotal
    }

    /// Amount taken off `subtotal`, never more than the subtotal itself.
    pub fn discount_on(&self, subtotal: Money) -> Money {
        if !self.is_eligible(subtotal) {
            return Money::zero();
        }

        let discount = match self.kind {
            CouponKind::Percent(rate) => subtotal.percentage(rate),
            CouponKind::Flat(amount) => amount,
            CouponKind::FreeShipping => Money::zero(),
        };
        discount.min(subtotal)
    }

    /// Checks if the coupon waives shipping for `subtotal`.
    pub fn waives_shipping(&self, subtotal: Money) -> bool {
        self.kind == CouponKind::FreeShipping && self.is_eligible(subtotal)
    }
}

/// The coupons the storefront accepts.
pub fn builtin_coupons() -> Vec<Coupon> {
    vec![
        Coupon {
            code: "SAVE10".to_string(),
            description: "10% off on orders above ₹1,00,000".to_string(),
            kind: CouponKind::Percent(Rate::from_percent(10)),
            min_subtotal: Money::from_rupees(100_000),
        },
        Coupon {
            code: "FIRSTBUY".to_string(),
            description: "₹5,000 off on first purchase".to_string(),
            kind: CouponKind::Flat(Money::from_rupees(5_000)),
            min_subtotal: Money::from_rupees(50_000),
        },
        Coupon {
            code: "FREESHIP".to_string(),
            description: "Free shipping on all orders".to_string(),
            kind: CouponKind::FreeShipping,
            min_subtotal: Money::zero(),
        },
    ]
}

/// Finds a coupon by code in `coupons`.
///
/// ## Errors
/// `Unrecognized` on field `promo_code` when nothing matches.
pub fn redeem(coupons: &[Coupon], code: &str) -> Result<Coupon, ValidationError> {
    let wanted = code.trim();

    if wanted.is_empty() {
        return Err(ValidationError::Required {
            field: "promo_code".to_string(),
        });
    }

    coupons
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| ValidationError::Unrecognized {
            field: "promo_code".to_string(),
            value: wanted.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_is_case_insensitive() {
        let coupons = builtin_coupons();
        let coupon = redeem(&coupons, "  save10 ").unwrap();
        assert_eq!(coupon.code, "SAVE10");
    }

    #[test]
    fn test_redeem_unknown_code() {
        let err = redeem(&builtin_coupons(), "BOGUS").unwrap_err();
        assert_eq!(err.field(), "promo_code");
        assert_eq!(err.to_string(), "Invalid promo code");
    }

    #[test]
    fn test_percent_discount_respects_minimum() {
        let save10 = redeem(&builtin_coupons(), "SAVE10").unwrap();

        assert!(save10.discount_on(Money::from_rupees(99_999)).is_zero());
        assert_eq!(
            save10.discount_on(Money::from_rupees(895_000)),
            Money::from_rupees(89_500)
        );
    }

    #[test]
    fn test_flat_discount() {
        let firstbuy = redeem(&builtin_coupons(), "FIRSTBUY").unwrap();
        assert_eq!(
            firstbuy.discount_on(Money::from_rupees(60_000)),
            Money::from_rupees(5_000)
        );
        assert!(firstbuy.discount_on(Money::from_rupees(40_000)).is_zero());
        assert!(!firstbuy.waives_shipping(Money::from_rupees(60_000)));
    }

    #[test]
    fn test_free_shipping() {
        let freeship = redeem(&builtin_coupons(), "freeship").unwrap();
        assert!(freeship.waives_shipping(Money::from_rupees(1_000)));
        assert!(freeship.discount_on(Money::from_rupees(1_000)).is_zero());
    }
}
