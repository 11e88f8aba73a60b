//! # Configuration State
//!
//! Storefront configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`storefront.toml`)
//! 3. Environment variables (`AGRI_*`)
//!
//! ## Example `storefront.toml`
//! ```toml
//! [store]
//! name = "AgriCommerce"
//! currency_symbol = "₹"
//!
//! [pricing]
//! gst_bps = 1800
//! free_shipping_above_rupees = 50000
//! shipping_fee_rupees = 5000
//! low_stock_threshold = 5
//!
//! [simulation]
//! auth_delay_ms = 1000
//! order_delay_ms = 2000
//!
//! [demo_user]
//! name = "राज पटेल"
//! phone = "+91 98765 43210"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use std::path::PathBuf;
use std::time::Duration;

use agri_core::money::Money;
use agri_core::pricing::{
    PricingPolicy, DEFAULT_FREE_SHIPPING_ABOVE_RUPEES, DEFAULT_GST_BPS, DEFAULT_SHIPPING_FEE_RUPEES,
};
use agri_core::types::Rate;
use agri_core::DEFAULT_LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "AGRI_CONFIG_PATH";

// =============================================================================
// Sections
// =============================================================================

/// Store identity and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "AgriCommerce".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Tax, shipping and stock hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_gst_bps")]
    pub gst_bps: u32,
    #[serde(default = "default_free_shipping_above")]
    pub free_shipping_above_rupees: i64,
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee_rupees: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_gst_bps() -> u32 {
    DEFAULT_GST_BPS
}

fn default_free_shipping_above() -> i64 {
    DEFAULT_FREE_SHIPPING_ABOVE_RUPEES
}

fn default_shipping_fee() -> i64 {
    DEFAULT_SHIPPING_FEE_RUPEES
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            gst_bps: default_gst_bps(),
            free_shipping_above_rupees: default_free_shipping_above(),
            shipping_fee_rupees: default_shipping_fee(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// Simulated backend latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_auth_delay_ms")]
    pub auth_delay_ms: u64,
    #[serde(default = "default_order_delay_ms")]
    pub order_delay_ms: u64,
}

fn default_auth_delay_ms() -> u64 {
    1000
}

fn default_order_delay_ms() -> u64 {
    2000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            auth_delay_ms: default_auth_delay_ms(),
            order_delay_ms: default_order_delay_ms(),
        }
    }
}

/// Profile handed out by the simulated login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUserConfig {
    #[serde(default = "default_demo_name")]
    pub name: String,
    #[serde(default = "default_demo_phone")]
    pub phone: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn default_demo_name() -> String {
    "राज पटेल".to_string()
}

fn default_demo_phone() -> String {
    "+91 98765 43210".to_string()
}

impl Default for DemoUserConfig {
    fn default() -> Self {
        DemoUserConfig {
            name: default_demo_name(),
            phone: default_demo_phone(),
            avatar: None,
        }
    }
}

// =============================================================================
// Storefront Config
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub demo_user: DemoUserConfig,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pricing.gst_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "gst_bps must be at most 10000, got {}",
                self.pricing.gst_bps
            )));
        }

        if self.pricing.free_shipping_above_rupees < 0 || self.pricing.shipping_fee_rupees < 0 {
            return Err(ConfigError::Invalid(
                "shipping amounts must not be negative".into(),
            ));
        }

        if self.pricing.low_stock_threshold < 1 {
            return Err(ConfigError::Invalid(
                "low_stock_threshold must be at least 1".into(),
            ));
        }

        if self.demo_user.name.trim().is_empty() {
            return Err(ConfigError::Invalid("demo_user.name must not be empty".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup` (the process environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(key, value = %value, "Ignoring unparsable environment override");
                    None
                }
            }
        }

        if let Some(symbol) = lookup("AGRI_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(bps) = parsed("AGRI_GST_BPS", lookup("AGRI_GST_BPS")) {
            debug!(gst_bps = bps, "Overriding GST rate from environment");
            self.pricing.gst_bps = bps;
        }

        if let Some(rupees) = parsed(
            "AGRI_FREE_SHIPPING_ABOVE",
            lookup("AGRI_FREE_SHIPPING_ABOVE"),
        ) {
            self.pricing.free_shipping_above_rupees = rupees;
        }

        if let Some(rupees) = parsed("AGRI_SHIPPING_FEE", lookup("AGRI_SHIPPING_FEE")) {
            self.pricing.shipping_fee_rupees = rupees;
        }

        if let Some(threshold) = parsed(
            "AGRI_LOW_STOCK_THRESHOLD",
            lookup("AGRI_LOW_STOCK_THRESHOLD"),
        ) {
            self.pricing.low_stock_threshold = threshold;
        }

        if let Some(ms) = parsed("AGRI_AUTH_DELAY_MS", lookup("AGRI_AUTH_DELAY_MS")) {
            debug!(auth_delay_ms = ms, "Overriding auth delay from environment");
            self.simulation.auth_delay_ms = ms;
        }

        if let Some(ms) = parsed("AGRI_ORDER_DELAY_MS", lookup("AGRI_ORDER_DELAY_MS")) {
            debug!(order_delay_ms = ms, "Overriding order delay from environment");
            self.simulation.order_delay_ms = ms;
        }

        if let Some(name) = lookup("AGRI_DEMO_USER_NAME") {
            self.demo_user.name = name;
        }
    }

    /// Returns the default config file path.
    ///
    /// `AGRI_CONFIG_PATH` wins over the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("in", "agricommerce", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pricing constants for agri-core.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            gst_rate: Rate::from_bps(self.pricing.gst_bps),
            free_shipping_above: Money::from_rupees(self.pricing.free_shipping_above_rupees),
            shipping_fee: Money::from_rupees(self.pricing.shipping_fee_rupees),
        }
    }

    /// Simulated login/registration latency.
    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.simulation.auth_delay_ms)
    }

    /// Simulated order placement latency.
    pub fn order_delay(&self) -> Duration {
        Duration::from_millis(self.simulation.order_delay_ms)
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.store.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
        assert_eq!(config.auth_delay(), Duration::from_millis(1000));
        assert_eq!(config.order_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [pricing]
            shipping_fee_rupees = 2500

            [simulation]
            order_delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.shipping_fee_rupees, 2500);
        assert_eq!(config.pricing.gst_bps, 1800);
        assert_eq!(config.simulation.order_delay_ms, 10);
        assert_eq!(config.simulation.auth_delay_ms, 1000);
        assert_eq!(config.store.currency_symbol, "₹");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("AGRI_GST_BPS", "1200"),
            ("AGRI_AUTH_DELAY_MS", "5"),
            ("AGRI_ORDER_DELAY_MS", "not-a-number"),
            ("AGRI_CURRENCY_SYMBOL", "Rs. "),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.pricing.gst_bps, 1200);
        assert_eq!(config.simulation.auth_delay_ms, 5);
        assert_eq!(config.simulation.order_delay_ms, 2000);
        assert_eq!(config.format_money(Money::from_rupees(50_000)), "Rs. 50,000");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        config.pricing.gst_bps = 20_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = StorefrontConfig::default();
        config.pricing.low_stock_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[simulation]"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err: ConfigError = toml::from_str::<StorefrontConfig>("[pricing\n")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
