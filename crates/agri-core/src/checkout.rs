//! # Checkout Wizard
//!
//! The linear Address → Payment → Review flow on top of the cart.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Wizard                                    │
//! │                                                                         │
//! │   start(cart) ── empty cart ──► Err(EmptyCart)  (no stepper shown)     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────┐ complete_address ┌─────────┐ complete_payment ┌────────┐ │
//! │   │ Address │ ───────────────► │ Payment │ ───────────────► │ Review │ │
//! │   │   (1)   │ ◄─────────────── │   (2)   │ ◄─────────────── │  (3)   │ │
//! │   └─────────┘       back       └─────────┘       back       └───┬────┘ │
//! │                                                                 │      │
//! │                                          complete_review        │      │
//! │                                                                 ▼      │
//! │                                                          ┌───────────┐ │
//! │                                                          │ Submitted │ │
//! │                                                          └───────────┘ │
//! │                                                                         │
//! │   Any completion for a step other than the current one is rejected     │
//! │   with InvalidTransition, so a wizard submits at most once.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Going back keeps every payload already entered.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::order::{Order, OrderLine, OrderStatus, StepState};
use crate::pricing::OrderTotals;
use crate::types::{Address, AddressInput, PaymentSelection};
use crate::validation::{validate_address_input, validate_payment};

// =============================================================================
// Steps
// =============================================================================

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutStep {
    Address,
    Payment,
    Review,
    Submitted,
}

impl CheckoutStep {
    /// The three visible steps.
    pub const VISIBLE: [CheckoutStep; 3] = [
        CheckoutStep::Address,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ];

    /// Stepper index 1 to 3; `Submitted` sits past the last step (4).
    pub fn index(&self) -> u8 {
        match self {
            CheckoutStep::Address => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
            CheckoutStep::Submitted => 4,
        }
    }

    /// Stepper caption.
    pub fn title(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "Delivery Address",
            CheckoutStep::Payment => "Payment Method",
            CheckoutStep::Review => "Review Order",
            CheckoutStep::Submitted => "Order Placed",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStep::Address => "Address",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Submitted => "Submitted",
        };
        f.write_str(name)
    }
}

/// One circle of the checkout stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StepIndicator {
    pub step: CheckoutStep,
    pub index: u8,
    pub title: String,
    pub state: StepState,
}

// =============================================================================
// Step Payloads
// =============================================================================

/// Address step payload: a saved address or a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum AddressChoice {
    Saved { id: String },
    New(AddressInput),
}

/// Review step payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewInput {
    pub accept_terms: bool,
}

/// Validates the review step.
pub fn check_review(review: &ReviewInput) -> Result<(), ValidationError> {
    if !review.accept_terms {
        return Err(ValidationError::NotAccepted {
            field: "terms".to_string(),
        });
    }
    Ok(())
}

/// Transient checkout state.
///
/// Not serializable: it may hold full card details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDraft {
    pub step: CheckoutStep,
    pub address: Option<Address>,
    pub payment: Option<PaymentSelection>,
}

/// Everything the three steps collected, ready to become an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub address: Address,
    pub payment: PaymentSelection,
    pub review: ReviewInput,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
}

impl Submission {
    /// Turns the submission into a confirmed order.
    pub fn into_order(self, id: String, placed_at: chrono::DateTime<chrono::Utc>) -> Order {
        Order {
            id,
            placed_at,
            status: OrderStatus::Confirmed,
            payment_label: self.payment.masked(),
            lines: self.lines,
            totals: self.totals,
            shipping_address: self.address,
        }
    }
}

// =============================================================================
// Wizard
// =============================================================================

/// The checkout wizard.
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    draft: CheckoutDraft,
}

impl CheckoutWizard {
    /// Starts checkout for `cart`.
    ///
    /// ## Errors
    /// `EmptyCart` when there is nothing to buy; the caller shows the
    /// empty-cart view instead of the stepper.
    pub fn start(cart: &Cart) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(CheckoutWizard {
            draft: CheckoutDraft {
                step: CheckoutStep::Address,
                address: None,
                payment: None,
            },
        })
    }

    /// Pre-selects an address on the address step without completing it.
    pub fn preselect_address(&mut self, address: Address) {
        if self.draft.step == CheckoutStep::Address && self.draft.address.is_none() {
            self.draft.address = Some(address);
        }
    }

    /// Current step.
    pub fn current_step(&self) -> CheckoutStep {
        self.draft.step
    }

    /// Read access to the draft.
    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    fn expect_step(&self, step: CheckoutStep, action: &'static str) -> CoreResult<()> {
        if self.draft.step != step {
            return Err(CoreError::InvalidTransition {
                current: self.draft.step,
                action,
            });
        }
        Ok(())
    }

    /// Completes the address step with a saved or a new address.
    ///
    /// ## Errors
    /// - `InvalidTransition` if not on the address step
    /// - `UnknownAddress` for a saved id not in `saved`
    /// - `Validation` with every failing field of a new address
    pub fn complete_address(
        &mut self,
        choice: AddressChoice,
        saved: &[Address],
    ) -> CoreResult<&Address> {
        self.expect_step(CheckoutStep::Address, "complete address")?;

        let address = match choice {
            AddressChoice::Saved { id } => saved
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(CoreError::UnknownAddress(id))?,
            AddressChoice::New(input) => {
                validate_address_input(&input)?;
                Address::from_input(Uuid::new_v4().to_string(), input)
            }
        };

        self.draft.step = CheckoutStep::Payment;
        Ok(self.draft.address.insert(address))
    }

    /// Completes the payment step.
    pub fn complete_payment(&mut self, payment: PaymentSelection) -> CoreResult<()> {
        self.expect_step(CheckoutStep::Payment, "complete payment")?;
        validate_payment(&payment)?;

        self.draft.payment = Some(payment);
        self.draft.step = CheckoutStep::Review;
        Ok(())
    }

    /// Completes the review step and produces the one submission of this
    /// wizard.
    ///
    /// `totals` is the pricing of `cart` at the moment of submission.
    pub fn complete_review(
        &mut self,
        review: ReviewInput,
        cart: &Cart,
        totals: OrderTotals,
    ) -> CoreResult<Submission> {
        self.expect_step(CheckoutStep::Review, "place order")?;
        check_review(&review)?;

        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let missing = CoreError::InvalidTransition {
            current: self.draft.step,
            action: "place order",
        };
        let (address, payment) = match (&self.draft.address, &self.draft.payment) {
            (Some(address), Some(payment)) => (address.clone(), payment.clone()),
            _ => return Err(missing),
        };

        self.draft.step = CheckoutStep::Submitted;
        Ok(Submission {
            address,
            payment,
            review,
            lines: cart.items().iter().map(OrderLine::from).collect(),
            totals,
        })
    }

    /// Goes back one step, keeping the data already entered.
    ///
    /// Back on the first step stays there. A submitted wizard cannot go back.
    pub fn back(&mut self) -> CoreResult<CheckoutStep> {
        self.draft.step = match self.draft.step {
            CheckoutStep::Address | CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Submitted => {
                return Err(CoreError::InvalidTransition {
                    current: CheckoutStep::Submitted,
                    action: "go back",
                })
            }
        };
        Ok(self.draft.step)
    }

    /// Stepper indicators for the three visible steps.
    pub fn stepper(&self) -> Vec<StepIndicator> {
        let current = self.draft.step.index();
        CheckoutStep::VISIBLE
            .iter()
            .map(|step| {
                let state = if step.index() < current {
                    StepState::Completed
                } else if step.index() == current {
                    StepState::Current
                } else {
                    StepState::Pending
                };
                StepIndicator {
                    step: *step,
                    index: step.index(),
                    title: step.title().to_string(),
                    state,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartAction, NewCartItem};
    use crate::money::Money;
    use crate::pricing::PricingPolicy;
    use crate::types::Bank;

    fn cart_with_tractor() -> Cart {
        let mut cart = Cart::new();
        cart.apply(CartAction::AddItem(NewCartItem {
            id: "1".to_string(),
            name: "Mahindra 575 DI XP Plus".to_string(),
            price: Money::from_rupees(895_000),
            quantity: 1,
            image: "/images/1.jpg".to_string(),
            stock: 5,
            variant: None,
        }));
        cart
    }

    fn saved_address() -> Address {
        Address {
            id: "addr-1".to_string(),
            name: "Rajesh Patel".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "Farm House, Village Kheda".to_string(),
            address_line2: None,
            city: "Anand".to_string(),
            state: "Gujarat".to_string(),
            pincode: "388001".to_string(),
            is_default: true,
        }
    }

    fn upi() -> PaymentSelection {
        PaymentSelection::Upi {
            upi_id: "rajesh@okhdfc".to_string(),
        }
    }

    fn accepted() -> ReviewInput {
        ReviewInput { accept_terms: true }
    }

    #[test]
    fn test_empty_cart_cannot_start() {
        assert!(matches!(
            CheckoutWizard::start(&Cart::new()),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_full_flow_yields_one_submission() {
        let cart = cart_with_tractor();
        let saved = vec![saved_address()];
        let totals = PricingPolicy::default().quote(cart.total(), None);
        let mut wizard = CheckoutWizard::start(&cart).unwrap();

        wizard
            .complete_address(
                AddressChoice::Saved {
                    id: "addr-1".to_string(),
                },
                &saved,
            )
            .unwrap();
        wizard.complete_payment(upi()).unwrap();
        let submission = wizard
            .complete_review(accepted(), &cart, totals.clone())
            .unwrap();

        assert_eq!(submission.address, saved_address());
        assert_eq!(submission.payment, upi());
        assert!(submission.review.accept_terms);
        assert_eq!(submission.lines.len(), 1);
        assert_eq!(submission.totals, totals);
        assert_eq!(wizard.current_step(), CheckoutStep::Submitted);

        assert!(matches!(
            wizard.complete_review(accepted(), &cart, totals),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_out_of_order_completion_rejected() {
        let cart = cart_with_tractor();
        let mut wizard = CheckoutWizard::start(&cart).unwrap();

        let err = wizard.complete_payment(upi()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                current: CheckoutStep::Address,
                ..
            }
        ));
        assert_eq!(wizard.current_step(), CheckoutStep::Address);
    }

    #[test]
    fn test_back_keeps_address() {
        let cart = cart_with_tractor();
        let mut wizard = CheckoutWizard::start(&cart).unwrap();
        wizard
            .complete_address(
                AddressChoice::Saved {
                    id: "addr-1".to_string(),
                },
                &[saved_address()],
            )
            .unwrap();

        assert_eq!(wizard.back().unwrap(), CheckoutStep::Address);
        assert_eq!(wizard.draft().address, Some(saved_address()));
        assert_eq!(wizard.back().unwrap(), CheckoutStep::Address);
    }

    #[test]
    fn test_new_address_is_validated() {
        let cart = cart_with_tractor();
        let mut wizard = CheckoutWizard::start(&cart).unwrap();

        let input = AddressInput {
            name: "Rajesh Patel".to_string(),
            phone: "98765".to_string(),
            address_line1: "Farm House".to_string(),
            address_line2: None,
            city: "Anand".to_string(),
            state: "Gujarat".to_string(),
            pincode: "3880".to_string(),
        };
        match wizard.complete_address(AddressChoice::New(input.clone()), &[]) {
            Err(CoreError::Validation(errors)) => {
                assert!(errors.for_field("phone").is_some());
                assert!(errors.for_field("pincode").is_some());
            }
            other => panic!("expected validation error, got {:?}", other.map(|a| a.id.clone())),
        }
        assert_eq!(wizard.current_step(), CheckoutStep::Address);

        let fixed = AddressInput {
            phone: "9876543210".to_string(),
            pincode: "388001".to_string(),
            ..input
        };
        let address = wizard
            .complete_address(AddressChoice::New(fixed), &[])
            .unwrap();
        assert!(!address.id.is_empty());
    }

    #[test]
    fn test_unknown_saved_address() {
        let cart = cart_with_tractor();
        let mut wizard = CheckoutWizard::start(&cart).unwrap();
        assert!(matches!(
            wizard.complete_address(
                AddressChoice::Saved {
                    id: "nope".to_string()
                },
                &[saved_address()]
            ),
            Err(CoreError::UnknownAddress(_))
        ));
    }

    #[test]
    fn test_terms_required() {
        let cart = cart_with_tractor();
        let totals = PricingPolicy::default().quote(cart.total(), None);
        let mut wizard = CheckoutWizard::start(&cart).unwrap();
        wizard
            .complete_address(
                AddressChoice::Saved {
                    id: "addr-1".to_string(),
                },
                &[saved_address()],
            )
            .unwrap();
        wizard
            .complete_payment(PaymentSelection::NetBanking { bank: Bank::Sbi })
            .unwrap();

        let err = wizard
            .complete_review(ReviewInput::default(), &cart, totals)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref e) if e.for_field("terms").is_some()));
        assert_eq!(wizard.current_step(), CheckoutStep::Review);
    }

    #[test]
    fn test_stepper_states() {
        let cart = cart_with_tractor();
        let mut wizard = CheckoutWizard::start(&cart).unwrap();
        wizard.preselect_address(saved_address());
        wizard
            .complete_address(
                AddressChoice::Saved {
                    id: "addr-1".to_string(),
                },
                &[saved_address()],
            )
            .unwrap();

        let states: Vec<StepState> = wizard.stepper().into_iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![StepState::Completed, StepState::Current, StepState::Pending]
        );
    }

    #[test]
    fn test_submission_into_order_masks_payment() {
        let submission = Submission {
            address: saved_address(),
            payment: PaymentSelection::Card {
                number: "4111111111111234".to_string(),
                holder: "R Patel".to_string(),
                expiry: "12/29".to_string(),
                cvv: "987".to_string(),
            },
            review: accepted(),
            lines: Vec::new(),
            totals: PricingPolicy::default().quote(Money::zero(), None),
        };
        let order = submission.into_order("ORD1".to_string(), chrono::Utc::now());

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_label, "Card ending 1234");
    }
}
