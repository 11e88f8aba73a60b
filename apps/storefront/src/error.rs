//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  {"cmd":"complete_address", ...}                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad form? ───── CoreError::Validation(FormErrors) ──┐          │  │
//! │  │         │                                            │          │  │
//! │  │         ▼                                            ▼          │  │
//! │  │  Wrong step? ─── CoreError::InvalidTransition ──── ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"error": {"code": "VALIDATION_ERROR",                                 │
//! │             "message": "2 fields need attention",                       │
//! │             "fields": [{"field": "pincode", "message": "..."}]}}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field errors are rendered inline next to their inputs, so validation
//! failures always carry the full `fields` list.

use agri_core::{CoreError, FormErrors, ValidationError};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: ORD42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages for inline form errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// One inline form error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Form input failed validation
    ValidationError,

    /// Account views and profile need a signed-in user
    Unauthenticated,

    /// Checkout intent out of order, or checkout on an empty cart
    CheckoutError,

    /// The request was cancelled before it completed
    Cancelled,

    /// Malformed request on the bridge
    InvalidRequest,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error carrying every failing field.
    pub fn validation(errors: &FormErrors) -> Self {
        let message = match errors.len() {
            1 => errors
                .iter()
                .next()
                .map(|e| e.to_string())
                .unwrap_or_default(),
            n => format!("{} fields need attention", n),
        };
        ApiError {
            code: ErrorCode::ValidationError,
            message,
            fields: errors.iter().map(FieldError::from).collect(),
        }
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Please sign in to continue")
    }

    /// Creates a cancelled error.
    pub fn cancelled(what: &str) -> Self {
        ApiError::new(ErrorCode::Cancelled, format!("{} was cancelled", what))
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => ApiError::validation(&errors),
            CoreError::UnknownAddress(id) => ApiError::not_found("Address", &id),
            CoreError::UnknownOrder(id) => ApiError::not_found("Order", &id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CheckoutError, "Cart is empty"),
            CoreError::InvalidTransition { current, action } => ApiError::new(
                ErrorCode::CheckoutError,
                format!("Cannot {} while checkout is at the {} step", action, current),
            ),
        }
    }
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        ApiError::validation(&errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(&FormErrors::from(err))
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
