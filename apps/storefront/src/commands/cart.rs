//! # Cart Commands
//!
//! Cart intents and promo codes.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  Wizard  │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                     cart cleared          │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                   apply_promo_code                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use agri_core::promo::{builtin_coupons, redeem, Coupon};
use agri_core::{CartAction, CartItem, Money, NewCartItem, OrderTotals};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::{CartState, Catalog, ShoppingCart, StorefrontConfig};

// =============================================================================
// Response Types
// =============================================================================

/// One cart line as displayed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineView {
    pub item: CartItem,
    pub line_total: Money,
    /// Shows the "Only N left" hint.
    pub low_stock: bool,
}

/// Totals rendered with the store currency, rounded to whole rupees.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub gst: String,
    pub shipping: String,
    pub discount: String,
    pub total: String,
    pub free_shipping_hint: Option<String>,
}

/// Cart response including items, totals and the applied coupon.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: i64,
    pub totals: OrderTotals,
    pub formatted: FormattedTotals,
    pub coupon: Option<Coupon>,
}

/// Toast shown after a cart intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Feedback {
    pub title: String,
    pub description: String,
}

/// Cart plus the toast to show, if any.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartUpdate {
    pub cart: CartView,
    pub feedback: Option<Feedback>,
}

/// Builds the cart view under the configured pricing.
pub fn cart_view(shopping: &ShoppingCart, config: &StorefrontConfig) -> CartView {
    let threshold = config.pricing.low_stock_threshold;
    let totals = shopping.quote(&config.pricing_policy());

    let lines = shopping
        .cart
        .items()
        .iter()
        .map(|item| CartLineView {
            line_total: item.line_total(),
            low_stock: item.is_low_stock(threshold),
            item: item.clone(),
        })
        .collect();

    let formatted = FormattedTotals {
        subtotal: config.format_money(totals.subtotal),
        gst: config.format_money(totals.gst),
        shipping: config.format_money(totals.shipping),
        discount: config.format_money(totals.discount),
        total: config.format_money(totals.total),
        free_shipping_hint: totals
            .free_shipping_shortfall
            .map(|more| format!("Add {} more for free shipping", config.format_money(more))),
    };

    CartView {
        lines,
        item_count: shopping.cart.item_count(),
        totals,
        formatted,
        coupon: shopping.coupon.clone(),
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState, config: &StorefrontConfig) -> CartView {
    debug!("get_cart command");
    cart.with_cart(|c| cart_view(c, config))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If the product is already in the cart: quantity increases, capped at stock
/// - If not: added with the catalog price frozen at this moment
///
/// ## Errors
/// - `NotFound` for an unknown product id
/// - `InvalidRequest` for an out-of-stock product or a quantity below 1
pub fn add_to_cart(
    catalog: &dyn Catalog,
    cart: &CartState,
    config: &StorefrontConfig,
    product_id: &str,
    quantity: Option<i64>,
) -> ApiResult<CartUpdate> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id, quantity, "add_to_cart command");

    if quantity <= 0 {
        return Err(ApiError::new(
            ErrorCode::InvalidRequest,
            format!("Quantity must be at least 1, got {}", quantity),
        ));
    }

    let product = catalog
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    if !product.in_stock() {
        return Err(ApiError::new(
            ErrorCode::InvalidRequest,
            format!("{} is out of stock", product.name),
        ));
    }

    let name = product.name.clone();
    cart.dispatch(CartAction::AddItem(NewCartItem::from_product(
        &product, quantity,
    )));

    Ok(CartUpdate {
        cart: get_cart(cart, config),
        feedback: Some(Feedback {
            title: "Added to cart".to_string(),
            description: format!("{} has been added to your cart.", name),
        }),
    })
}

/// Sets the quantity of a cart line; zero or less removes it.
pub fn update_cart_item(
    cart: &CartState,
    config: &StorefrontConfig,
    id: &str,
    quantity: i64,
) -> CartView {
    debug!(id, quantity, "update_cart_item command");
    cart.dispatch(CartAction::UpdateQuantity {
        id: id.to_string(),
        quantity,
    });
    get_cart(cart, config)
}

/// Removes a cart line.
pub fn remove_from_cart(cart: &CartState, config: &StorefrontConfig, id: &str) -> CartUpdate {
    debug!(id, "remove_from_cart command");

    let removed = cart.with_cart(|c| c.cart.get(id).map(|item| item.name.clone()));
    cart.dispatch(CartAction::RemoveItem { id: id.to_string() });

    CartUpdate {
        cart: get_cart(cart, config),
        feedback: removed.map(|name| Feedback {
            title: "Item removed".to_string(),
            description: format!("{} has been removed from your cart.", name),
        }),
    }
}

/// Empties the cart. The applied promo code stays.
pub fn clear_cart(cart: &CartState, config: &StorefrontConfig) -> CartView {
    debug!("clear_cart command");
    cart.dispatch(CartAction::Clear);
    get_cart(cart, config)
}

/// Applies a promo code.
///
/// ## Errors
/// `ValidationError` on field `promo_code` for an empty or unknown code;
/// the cart is left untouched.
pub fn apply_promo_code(
    cart: &CartState,
    config: &StorefrontConfig,
    code: &str,
) -> ApiResult<CartView> {
    debug!(code, "apply_promo_code command");

    let coupon = redeem(&builtin_coupons(), code)?;
    info!(code = %coupon.code, "Promo code applied");

    Ok(cart.with_cart_mut(|c| {
        c.coupon = Some(coupon);
        cart_view(c, config)
    }))
}

/// Removes the applied promo code.
pub fn remove_promo_code(cart: &CartState, config: &StorefrontConfig) -> CartView {
    debug!("remove_promo_code command");
    cart.with_cart_mut(|c| {
        c.coupon = None;
        cart_view(c, config)
    })
}
