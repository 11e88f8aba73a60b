//! # Pricing
//!
//! Turns a cart subtotal and an optional coupon into the order totals shown
//! on the cart page, the checkout sidebar and the review step.
//!
//! ```text
//!   subtotal   Σ price × qty
//! + GST        subtotal × 18%
//! + shipping   ₹0 above ₹50,000 (or with FREESHIP), else ₹5,000
//! − discount   SAVE10 / FIRSTBUY when eligible
//! ─────────────────────────────────────────────
//! = total
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::promo::Coupon;
use crate::types::Rate;

/// Default GST rate (18%).
pub const DEFAULT_GST_BPS: u32 = 1800;

/// Default free-shipping threshold in rupees.
pub const DEFAULT_FREE_SHIPPING_ABOVE_RUPEES: i64 = 50_000;

/// Default flat shipping fee in rupees.
pub const DEFAULT_SHIPPING_FEE_RUPEES: i64 = 5_000;

/// Tax and shipping constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub gst_rate: Rate,
    /// Subtotals strictly above this ship free.
    pub free_shipping_above: Money,
    pub shipping_fee: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            gst_rate: Rate::from_bps(DEFAULT_GST_BPS),
            free_shipping_above: Money::from_rupees(DEFAULT_FREE_SHIPPING_ABOVE_RUPEES),
            shipping_fee: Money::from_rupees(DEFAULT_SHIPPING_FEE_RUPEES),
        }
    }
}

impl PricingPolicy {
    /// Computes the totals for `subtotal` with an optional applied coupon.
    ///
    /// An empty cart (zero subtotal) is charged no shipping.
    pub fn quote(&self, subtotal: Money, coupon: Option<&Coupon>) -> OrderTotals {
        let gst = subtotal.percentage(self.gst_rate);
        let discount = coupon
            .map(|c| c.discount_on(subtotal))
            .unwrap_or_default();

        let waived = coupon.map(|c| c.waives_shipping(subtotal)).unwrap_or(false);
        let shipping = if subtotal.is_zero() || waived || subtotal > self.free_shipping_above {
            Money::zero()
        } else {
            self.shipping_fee
        };

        let free_shipping_shortfall = if subtotal < self.free_shipping_above {
            Some(self.free_shipping_above - subtotal)
        } else {
            None
        };

        OrderTotals {
            subtotal,
            gst,
            shipping,
            discount,
            total: subtotal + gst + shipping - discount,
            free_shipping_shortfall,
            coupon_code: coupon.map(|c| c.code.clone()),
        }
    }
}

/// Price breakdown of a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub gst: Money,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
    /// "Add ₹X more for free shipping", when the subtotal is under the threshold.
    pub free_shipping_shortfall: Option<Money>,
    pub coupon_code: Option<String>,
}
