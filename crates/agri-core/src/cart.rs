//! # Cart Module
//!
//! The cart reducer: line items in, totals derived on read.
//!
//! ## Intent Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Reducer                                         │
//! │                                                                         │
//! │  CartAction                      Cart.items change                      │
//! │  ──────────                      ─────────────────                      │
//! │                                                                         │
//! │  AddItem(new) ─────────────────► existing id: qty += n, clamp to stock │
//! │                                  new id: push, qty clamped [1, stock]  │
//! │                                                                         │
//! │  UpdateQuantity { id, qty } ───► qty <= 0: remove                      │
//! │                                  else: qty clamped [1, stock]          │
//! │                                                                         │
//! │  RemoveItem { id } ────────────► retain(id != ...)                     │
//! │                                                                         │
//! │  Clear ────────────────────────► items.clear()                         │
//! │                                                                         │
//! │  total() and item_count() are recomputed from items on every read.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantity bounds are never an error: out-of-range quantities are clamped
//! and intents naming an unknown id are silent no-ops.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Item
// =============================================================================

/// One line of the cart.
///
/// Name, price and image are frozen at the first add; re-adding the same id
/// only changes the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub image: String,
    pub stock: i64,
    pub variant: Option<String>,
}

impl CartItem {
    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Checks if stock is below `threshold` ("Only N left").
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

/// Payload of the add-to-cart intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub image: String,
    pub stock: i64,
    #[serde(default)]
    pub variant: Option<String>,
}

impl NewCartItem {
    /// Cart payload for `quantity` units of a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        NewCartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
            stock: product.stock,
            variant: product.variant.clone(),
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// The intents the cart accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CartAction {
    AddItem(NewCartItem),
    UpdateQuantity { id: String, quantity: i64 },
    RemoveItem { id: String },
    Clear,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id`
/// - Every quantity is in `[1, stock]`
/// - `total()` is Σ price × quantity, `item_count()` is Σ quantity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Applies one intent. Returns whether the items changed.
    pub fn apply(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::AddItem(item) => self.add_item(item),
            CartAction::UpdateQuantity { id, quantity } => self.update_quantity(&id, quantity),
            CartAction::RemoveItem { id } => self.remove_item(&id),
            CartAction::Clear => {
                let changed = !self.items.is_empty();
                self.items.clear();
                changed
            }
        }
    }

    fn add_item(&mut self, new: NewCartItem) -> bool {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == new.id) {
            if new.quantity <= 0 {
                return false;
            }
            let quantity = item.quantity.saturating_add(new.quantity).min(item.stock);
            let changed = quantity != item.quantity;
            item.quantity = quantity;
            return changed;
        }

        if new.quantity <= 0 || new.stock <= 0 {
            return false;
        }

        self.items.push(CartItem {
            quantity: new.quantity.clamp(1, new.stock),
            id: new.id,
            name: new.name,
            price: new.price,
            image: new.image,
            stock: new.stock,
            variant: new.variant,
        });
        true
    }

    fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                let quantity = quantity.clamp(1, item.stock.max(1));
                let changed = quantity != item.quantity;
                item.quantity = quantity;
                changed
            }
            None => false,
        }
    }

    fn remove_item(&mut self, id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot for the frontend.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

/// Cart snapshot returned by every cart command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total: Money,
    pub item_count: i64,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            items: cart.items.clone(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(id: &str, rupees: i64, quantity: i64, stock: i64) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            name: format!("Tractor {}", id),
            price: Money::from_rupees(rupees),
            quantity,
            image: format!("/images/{}.jpg", id),
            stock,
            variant: None,
        }
    }

    fn assert_totals_consistent(cart: &Cart) {
        let total: i64 = cart
            .items()
            .iter()
            .map(|i| i.price.paise() * i.quantity)
            .sum();
        let count: i64 = cart.items().iter().map(|i| i.quantity).sum();
        assert_eq!(cart.total().paise(), total);
        assert_eq!(cart.item_count(), count);
        for item in cart.items() {
            assert!(item.quantity >= 1 && item.quantity <= item.stock);
        }
    }

    #[test]
    fn test_add_same_tractor_twice() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 895_000, 1, 5)));
        cart.apply(CartAction::AddItem(new_item("A", 895_000, 1, 5)));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), Money::from_rupees(1_790_000));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_readd_keeps_first_price() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 895_000, 1, 5)));
        cart.apply(CartAction::AddItem(new_item("A", 900_000, 1, 5)));

        assert_eq!(cart.items()[0].price, Money::from_rupees(895_000));
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 10, 3)));
        assert_eq!(cart.get("A").map(|i| i.quantity), Some(3));

        cart.apply(CartAction::AddItem(new_item("A", 100, 2, 3)));
        assert_eq!(cart.get("A").map(|i| i.quantity), Some(3));
    }

    #[test]
    fn test_readd_huge_quantity_saturates_at_stock() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 1, 5)));
        assert!(cart.apply(CartAction::AddItem(new_item("A", 100, i64::MAX, 5))));

        assert_eq!(cart.get("A").map(|i| i.quantity), Some(5));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), Money::from_rupees(500));
    }

    #[test]
    fn test_add_ignores_non_positive_quantity_and_stock() {
        let mut cart = Cart::new();
        assert!(!cart.apply(CartAction::AddItem(new_item("A", 100, 0, 3))));
        assert!(!cart.apply(CartAction::AddItem(new_item("B", 100, 1, 0))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 2, 5)));

        cart.apply(CartAction::UpdateQuantity {
            id: "A".to_string(),
            quantity: 0,
        });
        assert!(cart.is_empty());

        cart.apply(CartAction::AddItem(new_item("A", 100, 2, 5)));
        cart.apply(CartAction::UpdateQuantity {
            id: "A".to_string(),
            quantity: -4,
        });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_above_stock_clamps() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 1, 4)));
        cart.apply(CartAction::UpdateQuantity {
            id: "A".to_string(),
            quantity: 99,
        });
        assert_eq!(cart.get("A").map(|i| i.quantity), Some(4));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 1, 4)));
        let before = cart.clone();

        assert!(!cart.apply(CartAction::UpdateQuantity {
            id: "Z".to_string(),
            quantity: 2,
        }));
        assert!(!cart.apply(CartAction::RemoveItem {
            id: "Z".to_string()
        }));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 1, 4)));
        cart.apply(CartAction::AddItem(new_item("B", 200, 2, 4)));
        cart.apply(CartAction::Clear);

        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_totals_hold_over_action_sequence() {
        let mut cart = Cart::new();
        let actions = vec![
            CartAction::AddItem(new_item("A", 895_000, 1, 5)),
            CartAction::AddItem(new_item("B", 675_000, 3, 2)),
            CartAction::AddItem(new_item("C", 125_000, 2, 10)),
            CartAction::AddItem(new_item("A", 895_000, 7, 5)),
            CartAction::UpdateQuantity {
                id: "C".to_string(),
                quantity: 4,
            },
            CartAction::RemoveItem {
                id: "B".to_string(),
            },
            CartAction::UpdateQuantity {
                id: "A".to_string(),
                quantity: 1,
            },
            CartAction::AddItem(new_item("D", 45_000, 1, 1)),
            CartAction::UpdateQuantity {
                id: "C".to_string(),
                quantity: 0,
            },
        ];

        for action in actions {
            cart.apply(action);
            assert_totals_consistent(&cart);
        }

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total(), Money::from_rupees(940_000));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_low_stock() {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(new_item("A", 100, 1, 3)));
        cart.apply(CartAction::AddItem(new_item("B", 100, 1, 12)));

        assert!(cart.get("A").map(|i| i.is_low_stock(5)).unwrap_or(false));
        assert!(!cart.get("B").map(|i| i.is_low_stock(5)).unwrap_or(true));
    }

    #[test]
    fn test_action_wire_format() {
        let action: CartAction =
            serde_json::from_str(r#"{"type":"UPDATE_QUANTITY","id":"A","quantity":3}"#).unwrap();
        assert_eq!(
            action,
            CartAction::UpdateQuantity {
                id: "A".to_string(),
                quantity: 3
            }
        );
    }
}
