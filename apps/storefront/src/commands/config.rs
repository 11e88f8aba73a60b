//! # Config Commands
//!
//! Exposes the parts of the configuration the frontend renders with.

use agri_core::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::state::StorefrontConfig;

/// Frontend view of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConfigView {
    pub store_name: String,
    pub currency_symbol: String,
    /// GST rate as a percentage (18.0 = 18%).
    pub gst_rate: f64,
    pub free_shipping_above: Money,
    pub shipping_fee: Money,
    pub low_stock_threshold: i64,
}

impl From<&StorefrontConfig> for ConfigView {
    fn from(config: &StorefrontConfig) -> Self {
        let policy = config.pricing_policy();
        ConfigView {
            store_name: config.store.name.clone(),
            currency_symbol: config.store.currency_symbol.clone(),
            gst_rate: policy.gst_rate.percentage(),
            free_shipping_above: policy.free_shipping_above,
            shipping_fee: policy.shipping_fee,
            low_stock_threshold: config.pricing.low_stock_threshold,
        }
    }
}

/// Gets the current storefront configuration.
///
/// ## When Used
/// - App startup (to configure UI)
/// - Currency formatting
pub fn get_config(config: &StorefrontConfig) -> ConfigView {
    debug!("get_config command");
    ConfigView::from(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_view() {
        let view = get_config(&StorefrontConfig::default());
        assert_eq!(view.currency_symbol, "₹");
        assert_eq!(view.gst_rate, 18.0);
        assert_eq!(view.free_shipping_above, Money::from_rupees(50_000));
        assert_eq!(view.shipping_fee, Money::from_rupees(5_000));
        assert_eq!(view.low_stock_threshold, 5);
    }
}
