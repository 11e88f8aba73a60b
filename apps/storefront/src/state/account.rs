//! # Account State
//!
//! Saved addresses, order history and wishlist of the demo customer.
//! Seeded with the demo data shown on the account pages.

use std::sync::{Arc, Mutex, PoisonError};

use agri_core::account::{AddressBook, OrderHistory, Wishlist};
use agri_core::order::{Order, OrderLine, OrderStatus};
use agri_core::{Address, Money, PricingPolicy};
use chrono::{TimeZone, Utc};

/// Everything the account pages show.
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub addresses: AddressBook,
    pub orders: OrderHistory,
    pub wishlist: Wishlist,
}

/// Shared account state.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    inner: Arc<Mutex<Account>>,
}

impl AccountState {
    /// Creates an empty account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the demo account; seeded order totals follow `policy`.
    pub fn seeded(policy: &PricingPolicy) -> Self {
        let addresses = seed_addresses();
        let home = addresses[0].clone();

        let mut wishlist = Wishlist::default();
        wishlist.toggle("2");
        wishlist.toggle("4");

        let account = Account {
            addresses: AddressBook::new(addresses),
            orders: OrderHistory::new(seed_orders(policy, &home)),
            wishlist,
        };

        AccountState {
            inner: Arc::new(Mutex::new(account)),
        }
    }

    /// Executes a function with read access to the account.
    pub fn with_account<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Account) -> R,
    {
        let account = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&account)
    }

    /// Executes a function with write access to the account.
    pub fn with_account_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Account) -> R,
    {
        let mut account = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut account)
    }
}

fn seed_addresses() -> Vec<Address> {
    vec![
        Address {
            id: "1".to_string(),
            name: "राजेश पटेल".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "Farm House, Village Kheda".to_string(),
            address_line2: Some("Near Government School".to_string()),
            city: "Anand".to_string(),
            state: "Gujarat".to_string(),
            pincode: "388001".to_string(),
            is_default: true,
        },
        Address {
            id: "2".to_string(),
            name: "राजेश पटेल".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "Shop No. 15, Agricultural Market".to_string(),
            address_line2: None,
            city: "Anand".to_string(),
            state: "Gujarat".to_string(),
            pincode: "388002".to_string(),
            is_default: false,
        },
    ]
}

fn seed_orders(policy: &PricingPolicy, ship_to: &Address) -> Vec<Order> {
    let order = |id: &str, (y, m, d): (i32, u32, u32), status, line: OrderLine, payment: &str| {
        let totals = policy.quote(line.line_total(), None);
        Order {
            id: id.to_string(),
            placed_at: Utc
                .with_ymd_and_hms(y, m, d, 10, 30, 0)
                .single()
                .unwrap_or_else(Utc::now),
            status,
            lines: vec![line],
            totals,
            shipping_address: ship_to.clone(),
            payment_label: payment.to_string(),
        }
    };

    vec![
        order(
            "ORD123456",
            (2024, 1, 15),
            OrderStatus::Delivered,
            OrderLine {
                product_id: "1".to_string(),
                name: "Mahindra 575 DI XP Plus".to_string(),
                image: "https://images.unsplash.com/photo-1581833971358-2c8b550f87b3?w=400&h=300&fit=crop".to_string(),
                quantity: 1,
                price: Money::from_rupees(895_000),
            },
            "UPI (rajesh@okhdfc)",
        ),
        order(
            "ORD123457",
            (2024, 1, 10),
            OrderStatus::Shipped,
            OrderLine {
                product_id: "3".to_string(),
                name: "Swaraj 744 FE".to_string(),
                image: "https://images.unsplash.com/photo-1581833971358-2c8b550f87b3?w=400&h=300&fit=crop".to_string(),
                quantity: 1,
                price: Money::from_rupees(675_000),
            },
            "Net Banking (State Bank of India)",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::order::OrderFilter;

    #[test]
    fn test_seeded_account() {
        let state = AccountState::seeded(&PricingPolicy::default());

        state.with_account(|account| {
            assert_eq!(account.addresses.list().len(), 2);
            assert_eq!(account.addresses.default_address().unwrap().id, "1");
            assert!(account.wishlist.contains("2"));
            assert!(account.wishlist.contains("4"));

            let orders = account.orders.list(&OrderFilter::default());
            assert_eq!(orders.len(), 2);
            assert_eq!(orders[0].id, "ORD123456");
            assert_eq!(orders[0].status, OrderStatus::Delivered);
            assert_eq!(orders[0].totals.total, Money::from_rupees(1_056_100));
        });
    }

    #[test]
    fn test_clones_share_the_account() {
        let state = AccountState::seeded(&PricingPolicy::default());
        let other = state.clone();

        state.with_account_mut(|a| a.wishlist.toggle("2"));
        assert!(!other.with_account(|a| a.wishlist.contains("2")));
    }
}
