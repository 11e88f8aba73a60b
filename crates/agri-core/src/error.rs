//! # Error Types
//!
//! Domain-specific error types for agri-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  agri-core errors (this file)                                          │
//! │  ├── CoreError        - Checkout transitions, lookups                  │
//! │  ├── FormErrors       - Every failing field of one submitted form      │
//! │  └── ValidationError  - One field, one reason                          │
//! │                                                                         │
//! │  storefront errors (app crate)                                         │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → FormErrors → CoreError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inline Field Errors
//! Forms report every offending field at once so the UI can render each
//! message next to its input. Nothing else in the store changes when a form
//! is rejected.

use std::fmt;

use thiserror::Error;

use crate::checkout::CheckoutStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core storefront logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A checkout intent arrived while the wizard was on another step.
    ///
    /// ## When This Occurs
    /// - Completing Payment while still on Address
    /// - Any completion after the order was submitted
    #[error("Cannot {action} while checkout is at the {current} step")]
    InvalidTransition {
        current: CheckoutStep,
        action: &'static str,
    },

    /// The cart has no items, so there is nothing to check out.
    #[error("Cart is empty")]
    EmptyCart,

    /// A saved address id that the address book does not hold.
    #[error("Address not found: {0}")]
    UnknownAddress(String),

    /// An order id that the order history does not hold.
    #[error("Order not found: {0}")]
    UnknownOrder(String),

    /// One or more form fields failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] FormErrors),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Validation(FormErrors::from(err))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. pincode with letters, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// A value outside the set the storefront recognizes (e.g. promo code).
    #[error("Invalid {}", .field.replace('_', " "))]
    Unrecognized { field: String, value: String },

    /// A box that must be ticked was left unticked.
    #[error("{field} must be accepted")]
    NotAccepted { field: String },
}

impl ValidationError {
    /// The form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::Unrecognized { field, .. }
            | ValidationError::NotAccepted { field } => field,
        }
    }
}

// =============================================================================
// Form Errors
// =============================================================================

/// All field failures of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct FormErrors(Vec<ValidationError>);

impl FormErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        FormErrors(Vec::new())
    }

    /// Records the error of a field check, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.0.push(err);
        }
    }

    /// Adds one field error.
    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    /// Checks if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the field errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns the error for `field`, if that field failed.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for FormErrors {
    fn from(err: ValidationError) -> Self {
        FormErrors(vec![err])
    }
}

impl IntoIterator for FormErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "pincode".to_string(),
        };
        assert_eq!(err.to_string(), "pincode is required");

        let err = ValidationError::Unrecognized {
            field: "promo_code".to_string(),
            value: "BOGUS".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid promo code");
    }

    #[test]
    fn test_form_errors_collects_fields() {
        let mut errors = FormErrors::new();
        errors.check(Ok(()));
        errors.check(Err(ValidationError::Required {
            field: "city".to_string(),
        }));
        errors.push(ValidationError::InvalidFormat {
            field: "pincode".to_string(),
            reason: "must be 6 digits".to_string(),
        });

        assert_eq!(errors.len(), 2);
        assert!(errors.for_field("city").is_some());
        assert!(errors.for_field("name").is_none());
        assert_eq!(
            errors.to_string(),
            "city is required; pincode has invalid format: must be 6 digits"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidTransition {
            current: CheckoutStep::Address,
            action: "complete payment",
        };
        assert_eq!(
            err.to_string(),
            "Cannot complete payment while checkout is at the Address step"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::NotAccepted {
            field: "terms".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(ref f) if f.len() == 1));
    }
}
