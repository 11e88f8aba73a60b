//! # State Module
//!
//! Manages application state for the storefront.
//!
//! ## Separate State Types
//! Each concern has its own state type. Commands declare exactly what state
//! they need; `AppState` only bundles them for the bridge.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        AppState                                 │   │
//! │  │  config · catalog · cart · auth · checkout · account · views    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │       ┌──────────────┬───────┴──────┬───────────────┐                  │
//! │       ▼              ▼              ▼               ▼                   │
//! │  ┌──────────┐  ┌───────────┐  ┌────────────┐  ┌─────────────┐          │
//! │  │CartState │  │ AuthState │  │CheckoutSt. │  │AccountState │          │
//! │  │Arc<Mutex>│  │Arc<RwLock>│  │ Arc<Mutex> │  │ Arc<Mutex>  │          │
//! │  └──────────┘  └───────────┘  └────────────┘  └─────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Every state is cheap to clone and shares its data                   │
//! │  • No lock is held across an .await                                   │
//! │  • Config and catalog are read-only after startup                      │
//! │                                                                         │
//! │  LOCK ORDER (when two are needed): cart before checkout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod account;
mod auth;
mod cart;
mod catalog;
mod checkout;
mod config;
mod views;

use std::sync::Arc;

pub use account::{Account, AccountState};
pub use auth::{AuthBackend, AuthState, SimulatedAuthBackend};
pub use cart::{CartState, ShoppingCart};
pub use catalog::{Catalog, InMemoryCatalog};
pub use checkout::CheckoutState;
pub use config::{
    DemoUserConfig, PricingConfig, SimulationConfig, StoreConfig, StorefrontConfig,
    CONFIG_PATH_ENV,
};
pub use views::ViewScopes;

/// All storefront state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<StorefrontConfig>,
    pub catalog: Arc<dyn Catalog>,
    pub cart: CartState,
    pub auth: AuthState,
    pub checkout: CheckoutState,
    pub account: AccountState,
    pub views: ViewScopes,
}

impl AppState {
    /// Demo storefront: seeded catalog and account, simulated auth.
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = SimulatedAuthBackend::new(config.auth_delay(), config.demo_user.clone());
        Self::with_parts(config, Arc::new(InMemoryCatalog::seeded()), Arc::new(backend))
    }

    /// Storefront on top of the given catalog and auth backend.
    pub fn with_parts(
        config: StorefrontConfig,
        catalog: Arc<dyn Catalog>,
        backend: Arc<dyn AuthBackend>,
    ) -> Self {
        let account = AccountState::seeded(&config.pricing_policy());

        AppState {
            config: Arc::new(config),
            catalog,
            cart: CartState::new(),
            auth: AuthState::new(backend),
            checkout: CheckoutState::new(),
            account,
            views: ViewScopes::new(),
        }
    }
}
