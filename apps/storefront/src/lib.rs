//! # AgriCommerce Storefront Library
//!
//! State core of the storefront: every store, every command, and the bridge
//! that exposes them to the frontend.
//!
//! ## Module Organization
//! ```text
//! agri_storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── bridge.rs       ◄─── JSON-lines IPC on stdin/stdout
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState bundle
//! │   ├── cart.rs     ◄─── Cart + applied promo code
//! │   ├── auth.rs     ◄─── Session, simulated auth backend
//! │   ├── checkout.rs ◄─── Checkout wizard in progress
//! │   ├── account.rs  ◄─── Addresses, orders, wishlist
//! │   ├── catalog.rs  ◄─── Read-only products
//! │   ├── config.rs   ◄─── StorefrontConfig loading
//! │   └── views.rs    ◄─── Per-view cancellation scopes
//! ├── commands/       ◄─── Intents exposed to the frontend
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod bridge;
pub mod commands;
pub mod error;
pub mod state;

use std::io;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, StorefrontConfig};

/// Runs the storefront until the frontend closes stdin.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,agri=debug, can be overridden with RUST_LOG         │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → storefront.toml → AGRI_* environment                   │
/// │     • falls back to defaults on any error                               │
/// │                                                                         │
/// │  3. Initialize State Objects ─────────────────────────────────────────► │
/// │     • Seeded catalog and demo account                                   │
/// │     • Empty cart, signed-out session                                    │
/// │                                                                         │
/// │  4. Serve the Bridge ─────────────────────────────────────────────────► │
/// │     • One JSON request per stdin line, one response per stdout line     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> io::Result<()> {
    init_tracing();

    info!("Starting AgriCommerce storefront");

    let config = StorefrontConfig::load_or_default(config_path);
    info!(
        store = %config.store.name,
        gst_bps = config.pricing.gst_bps,
        "Configuration loaded"
    );

    let state = AppState::new(config);
    info!("State initialized");

    bridge::serve(state, tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("Storefront stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=agri=trace` - Show trace for agri crates only
/// - Default: `info,agri=debug`
///
/// Stdout carries the bridge, so logs go to stderr.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,agri=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
