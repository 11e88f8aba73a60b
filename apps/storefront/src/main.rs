//! # AgriCommerce Storefront Entry Point
//!
//! Spawned by the desktop frontend; talks JSON lines over stdin/stdout.
//!
//! ```text
//! agri-storefront [CONFIG_PATH]
//! ```
//!
//! Without `CONFIG_PATH` the configuration comes from `AGRI_CONFIG_PATH` or
//! `storefront.toml` in the platform config directory.

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match agri_storefront_lib::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("agri-storefront: {}", e);
            ExitCode::FAILURE
        }
    }
}
