//! # Checkout Commands
//!
//! Drives the checkout wizard and places the order.
//!
//! ## Order Placement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    complete_review                                      │
//! │                                                                         │
//! │  1. Lock the wizard (must be on Review, terms accepted)                │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  2. select! { order delay , view token cancelled }                     │
//! │         │                          │                                    │
//! │         │                          └──► unlock, stay on Review         │
//! │         ▼                                                               │
//! │  3. Under the cart lock:                                               │
//! │     - price the cart                                                   │
//! │     - wizard ──► Submission (exactly once)                             │
//! │     - clear cart and promo code                                        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  4. Order "ORD<millis>" recorded in the order history                  │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  5. Navigation::OrderView { order_id, success: true }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use agri_core::checkout::{AddressChoice, ReviewInput, StepIndicator};
use agri_core::order::{order_id_at, Order};
use agri_core::{Address, CartAction, CheckoutStep, PaymentSelection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use ts_rs::TS;

use super::cart::{cart_view, CartView};
use crate::error::{ApiError, ApiResult};
use crate::state::{AccountState, CartState, CheckoutState, StorefrontConfig};

// =============================================================================
// Response Types
// =============================================================================

/// What the checkout page renders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum CheckoutView {
    /// Nothing to buy; the stepper is not rendered.
    EmptyCart,
    /// A wizard step.
    Step(WizardView),
}

/// One wizard step with everything entered so far.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WizardView {
    pub step: CheckoutStep,
    pub stepper: Vec<StepIndicator>,
    pub address: Option<Address>,
    /// Masked; card details never leave the draft.
    pub payment_label: Option<String>,
    pub saved_addresses: Vec<Address>,
    pub cart: CartView,
}

/// Where the frontend goes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "to", rename_all = "camelCase")]
#[ts(export)]
pub enum Navigation {
    #[serde(rename_all = "camelCase")]
    OrderView { order_id: String, success: bool },
}

/// Result of a successful order placement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlacedOrder {
    pub navigation: Navigation,
    pub order: Order,
}

fn checkout_view(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutView> {
    let cart = cart.with_cart(|c| cart_view(c, config));
    if cart.lines.is_empty() {
        return Ok(CheckoutView::EmptyCart);
    }

    let saved_addresses = account.with_account(|a| a.addresses.list().to_vec());
    checkout.with_wizard(|wizard| {
        let draft = wizard.draft();
        CheckoutView::Step(WizardView {
            step: wizard.current_step(),
            stepper: wizard.stepper(),
            address: draft.address.clone(),
            payment_label: draft.payment.as_ref().map(PaymentSelection::masked),
            saved_addresses,
            cart,
        })
    })
}

// =============================================================================
// Commands
// =============================================================================

/// Starts checkout on the address step with the default address pre-selected.
///
/// An empty cart yields `CheckoutView::EmptyCart` and no wizard.
pub fn begin_checkout(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutView> {
    debug!("begin_checkout command");

    if cart.with_cart(|c| c.cart.is_empty()) {
        checkout.discard();
        return Ok(CheckoutView::EmptyCart);
    }

    let default_address = account.with_account(|a| a.addresses.default_address().cloned());
    cart.with_cart(|c| checkout.begin(&c.cart, default_address))?;

    checkout_view(cart, checkout, account, config)
}

/// Gets the checkout in progress.
pub fn get_checkout(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutView> {
    debug!("get_checkout command");
    checkout_view(cart, checkout, account, config)
}

/// Completes the address step with a saved or a new address.
pub fn complete_address(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
    choice: AddressChoice,
) -> ApiResult<CheckoutView> {
    debug!("complete_address command");

    let saved = account.with_account(|a| a.addresses.list().to_vec());
    checkout.with_wizard_mut(|wizard| {
        let address = wizard.complete_address(choice, &saved)?;
        debug!(address_id = %address.id, "Delivery address chosen");
        Ok(())
    })?;

    checkout_view(cart, checkout, account, config)
}

/// Completes the payment step.
pub fn complete_payment(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
    payment: PaymentSelection,
) -> ApiResult<CheckoutView> {
    debug!(method = payment.method_name(), "complete_payment command");

    checkout.with_wizard_mut(|wizard| Ok(wizard.complete_payment(payment)?))?;
    checkout_view(cart, checkout, account, config)
}

/// Goes back one step, keeping what was entered.
pub fn checkout_back(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutView> {
    debug!("checkout_back command");

    checkout.with_wizard_mut(|wizard| Ok(wizard.back()?))?;
    checkout_view(cart, checkout, account, config)
}

/// Completes the review step and places the order.
///
/// ## Errors
/// - `ValidationError` if the terms were not accepted
/// - `CheckoutError` if not on the review step, or an order is already
///   being placed
/// - `Cancelled` if the view was closed during the order delay; the wizard
///   stays on the review step
pub async fn complete_review(
    cart: &CartState,
    checkout: &CheckoutState,
    account: &AccountState,
    config: &StorefrontConfig,
    scope: &CancellationToken,
    review: ReviewInput,
) -> ApiResult<PlacedOrder> {
    debug!(accept_terms = review.accept_terms, "complete_review command");
    checkout.begin_placing(&review)?;

    let token = scope.child_token();
    let elapsed = tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(config.order_delay()) => true,
    };
    if !elapsed {
        checkout.abort_placing();
        debug!("Order placement cancelled");
        return Err(ApiError::cancelled("Order placement"));
    }

    let policy = config.pricing_policy();
    let submission = cart.with_cart_mut(|shopping| {
        let totals = shopping.quote(&policy);
        let submission = checkout.submit(review, &shopping.cart, totals)?;
        shopping.cart.apply(CartAction::Clear);
        shopping.coupon = None;
        Ok::<_, ApiError>(submission)
    })?;

    let placed_at = Utc::now();
    let order = submission.into_order(order_id_at(placed_at), placed_at);
    info!(order_id = %order.id, total = %order.totals.total, "Order placed");

    account.with_account_mut(|a| a.orders.record(order.clone()));

    Ok(PlacedOrder {
        navigation: Navigation::OrderView {
            order_id: order.id.clone(),
            success: true,
        },
        order,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ErrorCode;
    use agri_core::order::OrderFilter;
    use agri_core::{AddressInput, NewCartItem, PricingPolicy, Product};

    use crate::state::{Catalog, InMemoryCatalog};

    struct Fixture {
        cart: CartState,
        checkout: CheckoutState,
        account: AccountState,
        config: StorefrontConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                cart: CartState::new(),
                checkout: CheckoutState::new(),
                account: AccountState::seeded(&PricingPolicy::default()),
                config: StorefrontConfig::default(),
            }
        }

        fn add(&self, product_id: &str) {
            let product: Product = InMemoryCatalog::seeded().get(product_id).unwrap();
            self.cart
                .dispatch(CartAction::AddItem(NewCartItem::from_product(&product, 1)));
        }

        fn begin(&self) -> CheckoutView {
            begin_checkout(&self.cart, &self.checkout, &self.account, &self.config).unwrap()
        }

        fn to_review(&self) {
            self.begin();
            complete_address(
                &self.cart,
                &self.checkout,
                &self.account,
                &self.config,
                AddressChoice::Saved { id: "1".to_string() },
            )
            .unwrap();
            complete_payment(
                &self.cart,
                &self.checkout,
                &self.account,
                &self.config,
                PaymentSelection::Upi {
                    upi_id: "rajesh@okhdfc".to_string(),
                },
            )
            .unwrap();
        }

        async fn place(&self, scope: &CancellationToken) -> ApiResult<PlacedOrder> {
            complete_review(
                &self.cart,
                &self.checkout,
                &self.account,
                &self.config,
                scope,
                ReviewInput { accept_terms: true },
            )
            .await
        }
    }

    fn step_of(view: &CheckoutView) -> Option<CheckoutStep> {
        match view {
            CheckoutView::Step(w) => Some(w.step),
            CheckoutView::EmptyCart => None,
        }
    }

    #[test]
    fn test_empty_cart_shows_empty_view() {
        let fx = Fixture::new();
        assert!(matches!(fx.begin(), CheckoutView::EmptyCart));
        assert!(!fx.checkout.is_active());
    }

    #[test]
    fn test_begin_preselects_default_address() {
        let fx = Fixture::new();
        fx.add("1");

        match fx.begin() {
            CheckoutView::Step(w) => {
                assert_eq!(w.step, CheckoutStep::Address);
                assert_eq!(w.address.unwrap().id, "1");
                assert_eq!(w.saved_addresses.len(), 2);
                assert_eq!(w.stepper.len(), 3);
            }
            CheckoutView::EmptyCart => panic!("expected the address step"),
        }
    }

    #[test]
    fn test_new_address_validation_errors() {
        let fx = Fixture::new();
        fx.add("1");
        fx.begin();

        let err = complete_address(
            &fx.cart,
            &fx.checkout,
            &fx.account,
            &fx.config,
            AddressChoice::New(AddressInput {
                pincode: "12".to_string(),
                ..AddressInput::default()
            }),
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.fields.iter().any(|f| f.field == "pincode"));
        assert!(err.fields.iter().any(|f| f.field == "name"));
    }

    #[test]
    fn test_back_from_payment_keeps_address() {
        let fx = Fixture::new();
        fx.add("3");
        fx.to_review();

        let view = checkout_back(&fx.cart, &fx.checkout, &fx.account, &fx.config).unwrap();
        assert_eq!(step_of(&view), Some(CheckoutStep::Payment));
        let view = checkout_back(&fx.cart, &fx.checkout, &fx.account, &fx.config).unwrap();
        assert_eq!(step_of(&view), Some(CheckoutStep::Address));

        match view {
            CheckoutView::Step(w) => {
                assert_eq!(w.address.unwrap().id, "1");
                assert_eq!(w.payment_label.as_deref(), Some("UPI (rajesh@okhdfc)"));
            }
            CheckoutView::EmptyCart => panic!("expected the address step"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_placement_clears_cart_and_records_order() {
        let fx = Fixture::new();
        fx.add("1");
        fx.to_review();
        let before = fx.account.with_account(|a| a.orders.len());

        let placed = fx.place(&CancellationToken::new()).await.unwrap();

        assert!(placed.order.id.starts_with("ORD"));
        assert_eq!(
            placed.navigation,
            Navigation::OrderView {
                order_id: placed.order.id.clone(),
                success: true,
            }
        );
        assert_eq!(placed.order.lines.len(), 1);
        assert_eq!(placed.order.payment_label, "UPI (rajesh@okhdfc)");
        assert!(fx.cart.with_cart(|c| c.cart.is_empty()));
        assert!(!fx.checkout.is_active());

        fx.account.with_account(|a| {
            assert_eq!(a.orders.len(), before + 1);
            assert!(a.orders.get(&placed.order.id).is_ok());
            assert_eq!(a.orders.list(&OrderFilter::default())[0].id, placed.order.id);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_placement_stays_on_review() {
        let fx = std::sync::Arc::new(Fixture::new());
        fx.add("1");
        fx.to_review();
        let scope = CancellationToken::new();

        let task = {
            let fx = fx.clone();
            let scope = scope.clone();
            tokio::spawn(async move { fx.place(&scope).await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        scope.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
        assert_eq!(fx.cart.with_cart(|c| c.cart.item_count()), 1);
        assert_eq!(
            fx.checkout.with_wizard(|w| w.current_step()).unwrap(),
            CheckoutStep::Review
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_is_refused() {
        let fx = std::sync::Arc::new(Fixture::new());
        fx.add("2");
        fx.to_review();

        let first = {
            let fx = fx.clone();
            tokio::spawn(async move { fx.place(&CancellationToken::new()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let err = fx.place(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);

        assert!(first.await.unwrap().is_ok());
        let err = fx.place(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terms_required() {
        let fx = Fixture::new();
        fx.add("1");
        fx.to_review();

        let err = complete_review(
            &fx.cart,
            &fx.checkout,
            &fx.account,
            &fx.config,
            &CancellationToken::new(),
            ReviewInput {
                accept_terms: false,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.fields[0].field, "terms");
        assert!(!fx.cart.with_cart(|c| c.cart.is_empty()));
    }
}
