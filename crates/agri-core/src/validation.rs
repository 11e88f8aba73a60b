//! # Validation Module
//!
//! Form validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Input masks (digits only, max length)                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command (Rust)                                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: every field checked, every failure reported          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Only ever sees validated payloads                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field validators return the first problem with one field. Form validators
//! run every field validator and collect the failures into [`FormErrors`].
//!
//! ## Usage
//! ```rust
//! use agri_core::validation::{validate_pincode, validate_phone};
//!
//! assert!(validate_pincode("388001").is_ok());
//! assert!(validate_phone("+91 98765 43210").is_ok());
//! assert!(validate_phone("12345").is_err());
//! ```

use crate::error::{FormErrors, ValidationError};
use crate::types::{AddressInput, LoginForm, PaymentSelection, ProfileSettings, RegistrationForm};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted free-text field.
pub const MAX_TEXT_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a text field is present and not overly long.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - One `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
///
/// ## Example
/// ```rust
/// use agri_core::validation::validate_email;
///
/// assert!(validate_email("rajesh@example.com").is_ok());
/// assert!(validate_email("rajesh@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a password for login.
///
/// Any non-empty password is accepted; credentials are not checked.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

/// Normalizes an Indian mobile number to its 10 digits.
///
/// Spaces and hyphens are dropped, then an optional `+91` prefix.
pub fn normalize_phone(phone: &str) -> String {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    compact
        .strip_prefix("+91")
        .map(str::to_string)
        .unwrap_or(compact)
}

/// Validates an Indian mobile number.
///
/// ## Rules
/// - Must not be empty
/// - Exactly 10 digits after removing spaces and an optional `+91`
///
/// ## Example
/// ```rust
/// use agri_core::validation::validate_phone;
///
/// assert!(validate_phone("9876543210").is_ok());
/// assert!(validate_phone("+91 98765 43210").is_ok());
/// assert!(validate_phone("98765").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = normalize_phone(phone);
    if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a 10-digit mobile number".to_string(),
        });
    }

    Ok(())
}

/// Validates an Indian postal code (exactly 6 digits).
pub fn validate_pincode(pincode: &str) -> ValidationResult<()> {
    let pincode = pincode.trim();

    if pincode.is_empty() {
        return Err(ValidationError::Required {
            field: "pincode".to_string(),
        });
    }

    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pincode".to_string(),
            reason: "must be exactly 6 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a UPI id of the form `name@handle`.
pub fn validate_upi_id(upi_id: &str) -> ValidationResult<()> {
    let upi_id = upi_id.trim();

    if upi_id.is_empty() {
        return Err(ValidationError::Required {
            field: "upi_id".to_string(),
        });
    }

    let well_formed = match upi_id.split_once('@') {
        Some((name, handle)) => {
            !name.is_empty()
                && !handle.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
                && handle.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "upi_id".to_string(),
            reason: "must look like name@bank".to_string(),
        });
    }

    Ok(())
}

/// Validates a card number: 12 to 19 digits, spaces allowed.
pub fn validate_card_number(number: &str) -> ValidationResult<()> {
    let compact: String = number.chars().filter(|c| *c != ' ').collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "card_number".to_string(),
        });
    }

    if !(12..=19).contains(&compact.len()) || !compact.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "card_number".to_string(),
            reason: "must be 12 to 19 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a card expiry in `MM/YY` form with month 01 to 12.
pub fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    let expiry = expiry.trim();

    if expiry.is_empty() {
        return Err(ValidationError::Required {
            field: "expiry".to_string(),
        });
    }

    let well_formed = match expiry.split_once('/') {
        Some((mm, yy)) if mm.len() == 2 && yy.len() == 2 => {
            let digits = mm.chars().chain(yy.chars()).all(|c| c.is_ascii_digit());
            digits && matches!(mm.parse::<u8>(), Ok(1..=12))
        }
        _ => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "expiry".to_string(),
            reason: "must be MM/YY".to_string(),
        });
    }

    Ok(())
}

/// Validates a card security code (3 or 4 digits).
pub fn validate_cvv(cvv: &str) -> ValidationResult<()> {
    let cvv = cvv.trim();

    if cvv.is_empty() {
        return Err(ValidationError::Required {
            field: "cvv".to_string(),
        });
    }

    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: "must be 3 or 4 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the new-address form.
pub fn validate_address_input(input: &AddressInput) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_required("name", &input.name));
    errors.check(validate_phone(&input.phone));
    errors.check(validate_required("address_line1", &input.address_line1));
    errors.check(validate_required("city", &input.city));
    errors.check(validate_required("state", &input.state));
    errors.check(validate_pincode(&input.pincode));
    errors.into_result()
}

/// Validates the payment step.
///
/// Net banking always names a supported bank: the [`Bank`](crate::types::Bank)
/// enum rejects anything else during deserialization.
pub fn validate_payment(payment: &PaymentSelection) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    match payment {
        PaymentSelection::Upi { upi_id } => errors.check(validate_upi_id(upi_id)),
        PaymentSelection::Card {
            number,
            holder,
            expiry,
            cvv,
        } => {
            errors.check(validate_card_number(number));
            errors.check(validate_required("card_holder", holder));
            errors.check(validate_expiry(expiry));
            errors.check(validate_cvv(cvv));
        }
        PaymentSelection::NetBanking { .. } => {}
    }
    errors.into_result()
}

/// Validates the login form.
pub fn validate_login(form: &LoginForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_email(&form.email));
    errors.check(validate_password(&form.password));
    errors.into_result()
}

/// Validates the registration form, including the password confirmation.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_required("name", &form.name));
    errors.check(validate_email(&form.email));
    errors.check(validate_phone(&form.phone));
    errors.check(validate_password(&form.password));

    if form.confirm_password != form.password {
        errors.push(ValidationError::Mismatch {
            field: "confirm_password".to_string(),
            other: "password".to_string(),
        });
    }

    errors.into_result()
}

/// Validates the profile settings form.
pub fn validate_profile(profile: &ProfileSettings) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_required("name", &profile.name));
    errors.check(validate_email(&profile.email));
    errors.check(validate_phone(&profile.phone));
    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
