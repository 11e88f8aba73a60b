//! # Checkout State
//!
//! Holds the wizard of the checkout in progress.
//!
//! ```text
//!   begin ──► Address ──► Payment ──► Review ──► placing ──► (discarded)
//!                 ▲           │          │           │
//!                 └── back ───┴── back ──┘      cancelled
//!                                                    │
//!                                                    ▼
//!                                                 Review
//! ```
//!
//! While an order is being placed the wizard is locked: step changes and a
//! second submission are refused until the first one resolves.

use std::sync::{Arc, Mutex, PoisonError};

use agri_core::checkout::{check_review, ReviewInput, Submission};
use agri_core::{Address, Cart, CheckoutStep, CheckoutWizard, CoreError, OrderTotals};
use tracing::debug;

use crate::error::{ApiError, ApiResult, ErrorCode};

#[derive(Debug, Default)]
struct CheckoutSession {
    wizard: Option<CheckoutWizard>,
    placing: bool,
}

/// Shared checkout state.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    inner: Arc<Mutex<CheckoutSession>>,
}

impl CheckoutState {
    /// Creates a state with no checkout in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh checkout for `cart`, discarding any previous draft.
    ///
    /// `default_address` is pre-selected on the address step.
    pub fn begin(&self, cart: &Cart, default_address: Option<Address>) -> ApiResult<CheckoutStep> {
        let mut session = self.lock();
        if session.placing {
            return Err(already_placing());
        }

        let mut wizard = CheckoutWizard::start(cart)?;
        if let Some(address) = default_address {
            wizard.preselect_address(address);
        }

        let step = wizard.current_step();
        session.wizard = Some(wizard);
        debug!(items = cart.item_count(), "Checkout started");
        Ok(step)
    }

    /// Checks if a checkout is in progress.
    pub fn is_active(&self) -> bool {
        self.lock().wizard.is_some()
    }

    /// Checks if an order is being placed.
    pub fn is_placing(&self) -> bool {
        self.lock().placing
    }

    /// Executes a function with read access to the wizard.
    pub fn with_wizard<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&CheckoutWizard) -> R,
    {
        let session = self.lock();
        session.wizard.as_ref().map(f).ok_or_else(not_started)
    }

    /// Executes a step transition on the wizard.
    pub fn with_wizard_mut<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut CheckoutWizard) -> ApiResult<R>,
    {
        let mut session = self.lock();
        if session.placing {
            return Err(already_placing());
        }
        let wizard = session.wizard.as_mut().ok_or_else(not_started)?;
        f(wizard)
    }

    /// Locks the wizard for order placement.
    ///
    /// ## Errors
    /// - `CheckoutError` if not on the review step or already placing
    /// - `ValidationError` if the terms were not accepted
    pub fn begin_placing(&self, review: &ReviewInput) -> ApiResult<()> {
        let mut session = self.lock();
        if session.placing {
            return Err(already_placing());
        }

        let wizard = session.wizard.as_ref().ok_or_else(not_started)?;
        let step = wizard.current_step();
        if step != CheckoutStep::Review {
            return Err(CoreError::InvalidTransition {
                current: step,
                action: "place order",
            }
            .into());
        }
        check_review(review)?;

        session.placing = true;
        Ok(())
    }

    /// Releases the placement lock, leaving the wizard on the review step.
    pub fn abort_placing(&self) {
        self.lock().placing = false;
    }

    /// Produces the submission and discards the wizard.
    ///
    /// On failure the placement lock is released and the wizard is kept.
    pub fn submit(
        &self,
        review: ReviewInput,
        cart: &Cart,
        totals: OrderTotals,
    ) -> ApiResult<Submission> {
        let mut session = self.lock();
        session.placing = false;

        let wizard = session.wizard.as_mut().ok_or_else(not_started)?;
        let submission = wizard.complete_review(review, cart, totals)?;
        session.wizard = None;
        Ok(submission)
    }

    /// Drops the checkout in progress.
    pub fn discard(&self) {
        let mut session = self.lock();
        session.wizard = None;
        session.placing = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CheckoutSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_started() -> ApiError {
    ApiError::new(ErrorCode::CheckoutError, "No checkout in progress")
}

fn already_placing() -> ApiError {
    ApiError::new(ErrorCode::CheckoutError, "Order is already being placed")
}
