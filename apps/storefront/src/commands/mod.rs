//! # Commands Module
//!
//! All intents exposed to the storefront frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── Cart intents, promo codes
//! ├── auth.rs      ◄─── Session, login, registration, profile
//! ├── checkout.rs  ◄─── Checkout wizard, order placement
//! ├── account.rs   ◄─── Orders, tracking, addresses, wishlist
//! ├── catalog.rs   ◄─── Product listing
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  {"id": 7, "cmd": "add_to_cart", "args": {"productId": "1"}}           │
//! │         │                                                               │
//! │         │ (one JSON line on stdin)                                      │
//! │         ▼                                                               │
//! │  Bridge                                                                 │
//! │  ──────                                                                 │
//! │  decode args ──► commands::add_to_cart(&catalog, &cart, &config, ..)   │
//! │         │                                                               │
//! │         │ (one JSON line on stdout)                                     │
//! │         ▼                                                               │
//! │  {"id": 7, "ok": {"cart": {...}, "feedback": {...}}}                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState, config: &StorefrontConfig)
//!
//! // Needs the catalog too
//! fn add_to_cart(catalog: &dyn Catalog, cart: &CartState, ...)
//!
//! // Deferred: runs under the view's cancellation token
//! async fn login(auth: &AuthState, scope: &CancellationToken, form: LoginForm)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

pub use account::*;
pub use auth::*;
pub use cart::*;
pub use catalog::*;
pub use checkout::*;
pub use config::*;
