//! # agri-core: Pure Storefront Logic for AgriCommerce
//!
//! This crate holds the business rules of the storefront as pure functions
//! and plain data. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     AgriCommerce Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web UI)                            │   │
//! │  │    Product page ──► Cart ──► Checkout ──► Order tracking        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON-lines IPC                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Storefront Commands                          │   │
//! │  │    add_to_cart, login, complete_address, track_order, etc.     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ agri-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  cart   │ │ checkout │ │ pricing │ │  order  │ │account │  │   │
//! │  │   │ reducer │ │  wizard  │ │  promo  │ │timeline │ │ books  │  │   │
//! │  │   └─────────┘ └──────────┘ └─────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO CLOCK READS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paise, rupee display with Indian grouping
//! - [`types`] - Domain types (Product, Session, Address, PaymentSelection)
//! - [`cart`] - Cart reducer and derived totals
//! - [`checkout`] - Address → Payment → Review wizard
//! - [`pricing`] - GST, shipping and discount math
//! - [`promo`] - Promo code table
//! - [`order`] - Orders, status timeline, history filter
//! - [`account`] - Address book, order history, wishlist
//! - [`validation`] - Form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use agri_core::cart::{Cart, CartAction, NewCartItem};
//! use agri_core::money::Money;
//!
//! let mut cart = Cart::new();
//! let tractor = NewCartItem {
//!     id: "1".to_string(),
//!     name: "Mahindra 575 DI XP Plus".to_string(),
//!     price: Money::from_rupees(895_000),
//!     quantity: 1,
//!     image: "/images/mahindra-575.jpg".to_string(),
//!     stock: 5,
//!     variant: None,
//! };
//!
//! cart.apply(CartAction::AddItem(tractor.clone()));
//! cart.apply(CartAction::AddItem(tractor));
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().to_string(), "₹17,90,000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod promo;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAction, CartItem, CartSummary, NewCartItem};
pub use checkout::{CheckoutStep, CheckoutWizard};
pub use error::{CoreError, CoreResult, FormErrors, ValidationError};
pub use money::Money;
pub use pricing::{OrderTotals, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Items with fewer units in stock than this show an "Only N left" hint.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;
