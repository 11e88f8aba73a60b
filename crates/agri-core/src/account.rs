//! # Account
//!
//! Address book, order history and wishlist of a signed-in customer.
//!
//! ## Address Book Invariant
//! A non-empty address book has exactly one default address:
//! - the first address added becomes the default
//! - `set_default` moves the flag
//! - deleting the default promotes the first remaining address

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::order::{Order, OrderFilter};
use crate::types::{Address, AddressInput};
use crate::validation::validate_address_input;

// =============================================================================
// Address Book
// =============================================================================

/// Saved delivery addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Builds an address book, repairing the default flag if needed.
    pub fn new(addresses: Vec<Address>) -> Self {
        let mut book = AddressBook { addresses };
        let default_id = book
            .addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| book.addresses.first())
            .map(|a| a.id.clone());
        if let Some(id) = default_id {
            book.mark_default(&id);
        }
        book
    }

    /// Saved addresses in insertion order.
    pub fn list(&self) -> &[Address] {
        &self.addresses
    }

    /// The default address, if any address is saved.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Validates and saves a new address.
    pub fn add(&mut self, input: AddressInput, make_default: bool) -> CoreResult<Address> {
        validate_address_input(&input)?;

        let address = Address::from_input(Uuid::new_v4().to_string(), input);
        let id = address.id.clone();
        let first = self.addresses.is_empty();
        self.addresses.push(address);

        if first || make_default {
            self.mark_default(&id);
        }

        self.get(&id).cloned()
    }

    /// Looks up a saved address.
    pub fn get(&self, id: &str) -> CoreResult<&Address> {
        self.addresses
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::UnknownAddress(id.to_string()))
    }

    /// Makes `id` the only default address.
    pub fn set_default(&mut self, id: &str) -> CoreResult<()> {
        self.get(id)?;
        self.mark_default(id);
        Ok(())
    }

    /// Removes a saved address.
    pub fn delete(&mut self, id: &str) -> CoreResult<Address> {
        let index = self
            .addresses
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::UnknownAddress(id.to_string()))?;
        let removed = self.addresses.remove(index);

        if removed.is_default {
            if let Some(first) = self.addresses.first_mut() {
                first.is_default = true;
            }
        }
        Ok(removed)
    }

    fn mark_default(&mut self, id: &str) {
        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }
    }
}

// =============================================================================
// Order History
// =============================================================================

/// Orders placed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Builds the history from existing orders.
    pub fn new(orders: Vec<Order>) -> Self {
        OrderHistory { orders }
    }

    /// Records a newly placed order.
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Orders passing `filter`, newest first.
    pub fn list(&self, filter: &OrderFilter) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().filter(|o| filter.matches(o)).collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        orders
    }

    /// Looks up an order by id.
    pub fn get(&self, id: &str) -> CoreResult<&Order> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::UnknownOrder(id.to_string()))
    }

    /// Number of recorded orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Checks if no order was placed yet.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// =============================================================================
// Wishlist
// =============================================================================

/// Saved product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    product_ids: Vec<String>,
}

impl Wishlist {
    /// Adds the product if absent, removes it if present.
    ///
    /// Returns whether the product is wishlisted afterwards.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.product_ids.push(product_id.to_string());
            true
        }
    }

    /// Removes a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.product_ids.len();
        self.product_ids.retain(|id| id != product_id);
        self.product_ids.len() != initial_len
    }

    /// Checks if a product is wishlisted.
    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    /// Wishlisted ids, oldest first.
    pub fn ids(&self) -> &[String] {
        &self.product_ids
    }
}
