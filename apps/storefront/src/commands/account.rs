//! # Account Commands
//!
//! Order history, order tracking, address book and wishlist.
//!
//! Every account page needs a signed-in customer. Reads answer
//! `AccountView::LoginRequired` so the frontend can show the login form in
//! place; writes fail with `Unauthenticated`.

use agri_core::order::{timeline, Order, OrderFilter, TimelineEntry};
use agri_core::{Address, AddressInput, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use super::cart::{add_to_cart, CartUpdate};
use crate::error::{ApiError, ApiResult};
use crate::state::{AccountState, AuthState, CartState, Catalog, StorefrontConfig};

// =============================================================================
// Response Types
// =============================================================================

/// An account page, or the login form in its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
#[ts(export)]
pub enum AccountView<T> {
    LoginRequired,
    Ready(T),
}

impl<T> AccountView<T> {
    /// The page content, if signed in.
    pub fn ready(self) -> Option<T> {
        match self {
            AccountView::Ready(data) => Some(data),
            AccountView::LoginRequired => None,
        }
    }
}

/// Order detail with its delivery timeline.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTracking {
    pub order: Order,
    pub timeline: Vec<TimelineEntry>,
}

/// Wishlist state of one product after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WishlistToggle {
    pub product_id: String,
    pub wishlisted: bool,
}

fn signed_in<T>(auth: &AuthState, page: impl FnOnce() -> ApiResult<T>) -> ApiResult<AccountView<T>> {
    if auth.current_user().is_none() {
        debug!("Account page requested without a session");
        return Ok(AccountView::LoginRequired);
    }
    page().map(AccountView::Ready)
}

// =============================================================================
// Orders
// =============================================================================

/// Lists orders newest first, filtered by status and order-id substring.
pub fn list_orders(
    auth: &AuthState,
    account: &AccountState,
    filter: OrderFilter,
) -> ApiResult<AccountView<Vec<Order>>> {
    debug!(status = ?filter.status, query = ?filter.query, "list_orders command");
    signed_in(auth, || {
        Ok(account.with_account(|a| a.orders.list(&filter).into_iter().cloned().collect()))
    })
}

/// Gets one order with its timeline.
///
/// ## Errors
/// `NotFound` for an unknown order id.
pub fn track_order(
    auth: &AuthState,
    account: &AccountState,
    order_id: &str,
) -> ApiResult<AccountView<OrderTracking>> {
    debug!(order_id, "track_order command");
    signed_in(auth, || {
        let order = account.with_account(|a| a.orders.get(order_id).cloned())?;
        Ok(OrderTracking {
            timeline: timeline(order.status),
            order,
        })
    })
}

// =============================================================================
// Addresses
// =============================================================================

/// Lists saved addresses.
pub fn list_addresses(
    auth: &AuthState,
    account: &AccountState,
) -> ApiResult<AccountView<Vec<Address>>> {
    debug!("list_addresses command");
    signed_in(auth, || {
        Ok(account.with_account(|a| a.addresses.list().to_vec()))
    })
}

/// Saves a new address. The first saved address becomes the default.
pub fn add_address(
    auth: &AuthState,
    account: &AccountState,
    input: AddressInput,
    make_default: bool,
) -> ApiResult<Vec<Address>> {
    debug!(make_default, "add_address command");
    auth.require_user()?;

    account.with_account_mut(|a| {
        let address = a.addresses.add(input, make_default)?;
        info!(address_id = %address.id, "Address saved");
        Ok(a.addresses.list().to_vec())
    })
}

/// Makes an address the default one.
pub fn set_default_address(
    auth: &AuthState,
    account: &AccountState,
    id: &str,
) -> ApiResult<Vec<Address>> {
    debug!(id, "set_default_address command");
    auth.require_user()?;

    account.with_account_mut(|a| {
        a.addresses.set_default(id)?;
        Ok(a.addresses.list().to_vec())
    })
}

/// Deletes an address. Deleting the default promotes the first remaining one.
pub fn delete_address(
    auth: &AuthState,
    account: &AccountState,
    id: &str,
) -> ApiResult<Vec<Address>> {
    debug!(id, "delete_address command");
    auth.require_user()?;

    account.with_account_mut(|a| {
        a.addresses.delete(id)?;
        Ok(a.addresses.list().to_vec())
    })
}

// =============================================================================
// Wishlist
// =============================================================================

/// Wishlisted products, oldest first. Ids no longer in the catalog are skipped.
pub fn get_wishlist(
    auth: &AuthState,
    account: &AccountState,
    catalog: &dyn Catalog,
) -> ApiResult<AccountView<Vec<Product>>> {
    debug!("get_wishlist command");
    signed_in(auth, || {
        let ids = account.with_account(|a| a.wishlist.ids().to_vec());
        Ok(ids.iter().filter_map(|id| catalog.get(id)).collect())
    })
}

/// Adds a product to the wishlist, or removes it if already there.
pub fn toggle_wishlist(
    auth: &AuthState,
    account: &AccountState,
    catalog: &dyn Catalog,
    product_id: &str,
) -> ApiResult<WishlistToggle> {
    debug!(product_id, "toggle_wishlist command");
    auth.require_user()?;

    if catalog.get(product_id).is_none() {
        return Err(ApiError::not_found("Product", product_id));
    }

    let wishlisted = account.with_account_mut(|a| a.wishlist.toggle(product_id));
    Ok(WishlistToggle {
        product_id: product_id.to_string(),
        wishlisted,
    })
}

/// Moves a wishlisted product into the cart.
pub fn move_to_cart(
    auth: &AuthState,
    account: &AccountState,
    catalog: &dyn Catalog,
    cart: &CartState,
    config: &StorefrontConfig,
    product_id: &str,
) -> ApiResult<CartUpdate> {
    debug!(product_id, "move_to_cart command");
    auth.require_user()?;

    let update = add_to_cart(catalog, cart, config, product_id, None)?;
    account.with_account_mut(|a| a.wishlist.remove(product_id));
    Ok(update)
}
