//! # Cart State
//!
//! Manages the shopping cart and the promo code applied to it.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//! 3. Deferred commands (order placement) run on other tasks
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Frontend Action          Command                 Cart Intent           │
//! │  ───────────────          ───────                 ───────────           │
//! │                                                                         │
//! │  Add to Cart ────────────► add_to_cart() ───────► AddItem               │
//! │                                                                         │
//! │  Quantity Stepper ───────► update_cart_item() ──► UpdateQuantity        │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► RemoveItem            │
//! │                                                                         │
//! │  Order Placed ───────────► complete_review() ───► Clear                 │
//! │                                                                         │
//! │  Apply Promo ────────────► apply_promo_code() ──► coupon = Some(..)     │
//! │                                                                         │
//! │  NOTE: the lock is never held across an .await                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use agri_core::promo::Coupon;
use agri_core::{Cart, CartAction, CartSummary, OrderTotals, PricingPolicy};
use tracing::debug;

/// The cart plus its applied promo code.
#[derive(Debug, Clone, Default)]
pub struct ShoppingCart {
    pub cart: Cart,
    pub coupon: Option<Coupon>,
}

impl ShoppingCart {
    /// Order totals of the current items under `policy`.
    pub fn quote(&self, policy: &PricingPolicy) -> OrderTotals {
        policy.quote(self.cart.total(), self.coupon.as_ref())
    }
}

/// Shared cart state.
///
/// ## Why Not RwLock?
/// Cart operations are quick and most of them write.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    inner: Arc<Mutex<ShoppingCart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ShoppingCart) -> R,
    {
        let cart = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ShoppingCart) -> R,
    {
        let mut cart = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Applies one cart intent and returns the resulting snapshot.
    pub fn dispatch(&self, action: CartAction) -> CartSummary {
        self.with_cart_mut(|c| {
            let label = action_name(&action);
            let changed = c.cart.apply(action);
            if !changed {
                debug!(action = label, "Cart intent left the cart unchanged");
            }
            c.cart.summary()
        })
    }

    /// Empties the cart and drops the applied promo code.
    pub fn reset(&self) {
        self.with_cart_mut(|c| {
            c.cart.apply(CartAction::Clear);
            c.coupon = None;
        });
    }
}

fn action_name(action: &CartAction) -> &'static str {
    match action {
        CartAction::AddItem(_) => "add_item",
        CartAction::UpdateQuantity { .. } => "update_quantity",
        CartAction::RemoveItem { .. } => "remove_item",
        CartAction::Clear => "clear",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::promo::{builtin_coupons, redeem};
    use agri_core::{Money, NewCartItem};

    fn tractor() -> NewCartItem {
        NewCartItem {
            id: "1".to_string(),
            name: "Mahindra 575 DI XP Plus".to_string(),
            price: Money::from_rupees(895_000),
            quantity: 1,
            image: "/images/1.jpg".to_string(),
            stock: 5,
            variant: None,
        }
    }

    #[test]
    fn test_dispatch_returns_summary() {
        let state = CartState::new();
        state.dispatch(CartAction::AddItem(tractor()));
        let summary = state.dispatch(CartAction::AddItem(tractor()));

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total, Money::from_rupees(1_790_000));
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new();
        let other = state.clone();
        state.dispatch(CartAction::AddItem(tractor()));

        assert_eq!(other.with_cart(|c| c.cart.item_count()), 1);
    }

    #[test]
    fn test_reset_drops_coupon() {
        let state = CartState::new();
        state.dispatch(CartAction::AddItem(tractor()));
        state.with_cart_mut(|c| c.coupon = redeem(&builtin_coupons(), "SAVE10").ok());

        let totals = state.with_cart(|c| c.quote(&PricingPolicy::default()));
        assert_eq!(totals.discount, Money::from_rupees(89_500));

        state.reset();
        assert!(state.with_cart(|c| c.cart.is_empty() && c.coupon.is_none()));
    }
}
